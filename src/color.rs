//! Placeholder colour for surfaces with nothing to show.

/// An opaque RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// The near-black backdrop behind the hero sequence.
    pub const BACKDROP: Color = Color::rgb(0x12, 0x12, 0x12);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb` or a handful of CSS names.
    ///
    /// Case-insensitive, surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.strip_prefix('#') {
            Some(hex) => parse_hex(hex),
            None => parse_named(s),
        }
    }

    /// Parse, falling back to [`Color::BACKDROP`] for anything unrecognised.
    pub fn parse_or_backdrop(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::BACKDROP)
    }

    /// CSS `rgb(r,g,b)` string for canvas fill styles.
    pub fn css(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }

    #[inline]
    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => Some(Color::rgb(
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        )),
        6 => Some(Color::rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

fn parse_named(s: &str) -> Option<Color> {
    match s.to_lowercase().as_str() {
        "black"         => Some(Color::rgb(0, 0, 0)),
        "white"         => Some(Color::rgb(255, 255, 255)),
        "gray" | "grey" => Some(Color::rgb(128, 128, 128)),
        "transparent"   => Some(Color::rgb(0, 0, 0)),
        _               => None,
    }
}
