//! Caption crossfades that follow playback progress.
//!
//! The overlay reads the same progress value the player maps to frames;
//! the player knows nothing about it.

/// The caption to show at some progress, and how opaque it is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptionFrame {
    /// Index of the active cue
    pub index: usize,
    /// Opacity in `[0, 1]`
    pub opacity: f64,
}

/// Ordered caption cues keyed by the progress at which each one takes over.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionTrack {
    starts: Vec<f64>,
    fade: f64,
}

impl CaptionTrack {
    /// Opacities this close to 0 or 1 are snapped to the bound.
    const SNAP_EPSILON: f64 = 1e-9;

    /// Build a track from cue start points (progress values) and a crossfade
    /// width, also in progress units.
    ///
    /// Starts are clamped to `[0, 1]` and sorted; NaNs are dropped.
    pub fn new(starts: impl IntoIterator<Item = f64>, fade: f64) -> Self {
        let mut starts: Vec<f64> = starts
            .into_iter()
            .filter(|s| !s.is_nan())
            .map(|s| s.clamp(0.0, 1.0))
            .collect();
        starts.sort_by(f64::total_cmp);
        let fade = if fade.is_finite() { fade.max(0.0) } else { 0.0 };
        Self { starts, fade }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Active caption at `progress`.
    ///
    /// Every cue after the first fades in over `fade` after its start, and
    /// every cue before the last fades out over `fade` before the next one
    /// begins. Returns None before the first cue.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use scrolly_frames::CaptionTrack;
    ///
    /// let track = CaptionTrack::new([0.0, 0.5], 0.1);
    /// assert_eq!(track.sample(0.2).unwrap().index, 0);
    /// assert_eq!(track.sample(0.2).unwrap().opacity, 1.0);
    /// assert_eq!(track.sample(0.55).unwrap().index, 1);
    /// ```
    pub fn sample(&self, progress: f64) -> Option<CaptionFrame> {
        let p = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        let index = self.starts.iter().rposition(|&start| start <= p)?;

        let mut opacity: f64 = 1.0;
        if self.fade > 0.0 {
            if index > 0 {
                opacity = opacity.min((p - self.starts[index]) / self.fade);
            }
            if let Some(&next) = self.starts.get(index + 1) {
                opacity = opacity.min((next - p) / self.fade);
            }
        }

        let opacity = match opacity.clamp(0.0, 1.0) {
            o if o > 1.0 - Self::SNAP_EPSILON => 1.0,
            o if o < Self::SNAP_EPSILON => 0.0,
            o => o,
        };
        Some(CaptionFrame { index, opacity })
    }
}
