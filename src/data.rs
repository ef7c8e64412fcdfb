//! Core data structures for image sequences.

/// Addressing for a numbered image sequence.
///
/// Frame `i` lives at `{base_dir}/{i:03}.{extension}`, e.g. index 7 of a
/// `/sequence` webp sequence is `/sequence/007.webp`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FrameSource {
    /// Directory (or URL prefix) holding the frames
    pub base_dir: String,
    /// File extension without the leading dot
    pub extension: String,
    /// Total number of frames in the sequence
    pub frame_count: usize,
}

impl Default for FrameSource {
    fn default() -> Self {
        Self {
            base_dir: "/sequence".to_string(),
            extension: "webp".to_string(),
            frame_count: 120,
        }
    }
}

impl FrameSource {
    /// Create a new FrameSource
    pub fn new(base_dir: impl Into<String>, extension: impl Into<String>, frame_count: usize) -> Self {
        Self {
            base_dir: base_dir.into(),
            extension: extension.into(),
            frame_count,
        }
    }

    /// Zero-padded three digit file stem for a frame index.
    ///
    /// - 0 -> "000"
    /// - 7 -> "007"
    /// - 119 -> "119"
    pub fn stem(index: usize) -> String {
        format!("{index:03}")
    }

    /// URI of the frame at `index`.
    pub fn uri(&self, index: usize) -> String {
        let base = self.base_dir.trim_end_matches('/');
        let ext = self.extension.trim_start_matches('.');
        format!("{}/{}.{}", base, Self::stem(index), ext)
    }

    /// All frame URIs in index order.
    pub fn uris(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.frame_count).map(|i| self.uri(i))
    }
}

/// A decoded frame with known native pixel dimensions.
///
/// Frames of one sequence are usually uniform in size, but nothing here
/// relies on it: placement is computed per frame.
pub trait FrameImage {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

impl FrameImage for image::RgbaImage {
    #[inline]
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    #[inline]
    fn height(&self) -> u32 {
        self.dimensions().1
    }
}

#[cfg(feature = "web")]
impl FrameImage for web_sys::HtmlImageElement {
    #[inline]
    fn width(&self) -> u32 {
        self.natural_width()
    }

    #[inline]
    fn height(&self) -> u32 {
        self.natural_height()
    }
}

/// Outcome of fetching one frame. A failure is terminal for that index.
#[derive(Clone, Debug)]
pub enum LoadResult<I> {
    Loaded(I),
    Failed,
}

impl<I> LoadResult<I> {
    #[inline]
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadResult::Loaded(_))
    }

    #[inline]
    pub fn image(&self) -> Option<&I> {
        match self {
            LoadResult::Loaded(image) => Some(image),
            LoadResult::Failed => None,
        }
    }
}

/// The settled outcomes of every fetch in a sequence, in index order.
#[derive(Clone, Debug)]
pub struct FrameSet<I> {
    slots: Vec<LoadResult<I>>,
    ready_count: usize,
}

impl<I> FrameSet<I> {
    /// Build a set from per-index outcomes. Slot `i` must hold the outcome of frame `i`.
    pub fn from_outcomes(slots: Vec<LoadResult<I>>) -> Self {
        let ready_count = slots.iter().filter(|s| s.is_loaded()).count();
        Self { slots, ready_count }
    }

    /// Total number of slots (the configured sequence length).
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Number of frames that loaded successfully.
    #[inline]
    pub fn ready_count(&self) -> usize {
        self.ready_count
    }

    /// True when no frame loaded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ready_count == 0
    }

    /// The image at `index`, or None if it failed or is out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&I> {
        self.slots.get(index).and_then(LoadResult::image)
    }

    /// The highest loaded index at or below `index`.
    pub fn last_loaded_at_or_before(&self, index: usize) -> Option<usize> {
        let end = index.saturating_add(1).min(self.slots.len());
        self.slots[..end].iter().rposition(LoadResult::is_loaded)
    }

    /// Indices whose fetch failed.
    pub fn failed_indices(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_loaded())
            .map(|(i, _)| i)
            .collect()
    }
}
