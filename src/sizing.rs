//! Surface sizing and cover-fit calculations.

/// Logical size of a drawing surface plus the display's device pixel ratio.
///
/// All drawing happens in logical (CSS) pixels; the backing store holds
/// `logical * dpr` physical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
    /// Logical width in CSS pixels
    pub logical_width: f64,
    /// Logical height in CSS pixels
    pub logical_height: f64,
    /// Physical pixels per logical pixel
    pub dpr: f64,
}

impl SurfaceSize {
    /// Create a new SurfaceSize, sanitizing non-finite or negative input.
    ///
    /// A missing or bogus device pixel ratio is treated as 1.0.
    pub fn new(logical_width: f64, logical_height: f64, dpr: f64) -> Self {
        let sane = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        Self {
            logical_width: sane(logical_width),
            logical_height: sane(logical_height),
            dpr,
        }
    }

    /// Backing store dimensions in physical pixels.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use scrolly_frames::SurfaceSize;
    ///
    /// let size = SurfaceSize::new(800.0, 600.0, 2.0);
    /// assert_eq!(size.backing_size(), (1600, 1200));
    /// ```
    pub fn backing_size(&self) -> (u32, u32) {
        let w = (self.logical_width * self.dpr).round() as u32;
        let h = (self.logical_height * self.dpr).round() as u32;
        (w, h)
    }

    /// True when there is nothing to draw into.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.logical_width <= 0.0 || self.logical_height <= 0.0
    }
}

/// Placement of an image scaled to cover a box.
///
/// The image is scaled uniformly until both axes fill the box, then
/// centered; whatever overflows is cropped. Never letterboxes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverFit {
    /// Uniform scale applied to the image
    pub scale: f64,
    /// Left edge of the drawn image in box coordinates (may be negative)
    pub x: f64,
    /// Top edge of the drawn image in box coordinates (may be negative)
    pub y: f64,
    /// Drawn width
    pub width: f64,
    /// Drawn height
    pub height: f64,
}

impl CoverFit {
    /// Compute the cover placement of an `image_width x image_height`
    /// image inside a `box_width x box_height` box.
    ///
    /// Returns None for an image with a zero dimension.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use scrolly_frames::CoverFit;
    ///
    /// let fit = CoverFit::compute(200.0, 200.0, 400, 200).unwrap();
    /// assert_eq!(fit.scale, 1.0);
    /// assert_eq!((fit.x, fit.y), (-100.0, 0.0));
    /// ```
    pub fn compute(box_width: f64, box_height: f64, image_width: u32, image_height: u32) -> Option<Self> {
        if image_width == 0 || image_height == 0 {
            return None;
        }
        let iw = image_width as f64;
        let ih = image_height as f64;

        let scale = (box_width / iw).max(box_height / ih);
        let width = iw * scale;
        let height = ih * scale;

        Some(Self {
            scale,
            x: box_width / 2.0 - width / 2.0,
            y: box_height / 2.0 - height / 2.0,
            width,
            height,
        })
    }
}
