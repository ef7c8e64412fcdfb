//! Progress-to-frame mapping and playback state.

/// Map a normalized progress value to a frame index.
///
/// `index = floor(progress * (frame_count - 1))`, with progress clamped to
/// `[0, 1]` first. NaN is treated as 0. This is the only place progress
/// becomes a frame index; scroll and time playback both go through it.
///
/// ## Example
///
/// ```rust
/// use scrolly_frames::map_progress_to_frame;
///
/// assert_eq!(map_progress_to_frame(0.0, 120), 0);
/// assert_eq!(map_progress_to_frame(0.5, 5), 2);
/// assert_eq!(map_progress_to_frame(1.0, 120), 119);
/// assert_eq!(map_progress_to_frame(1.4, 120), 119);
/// assert_eq!(map_progress_to_frame(-0.2, 120), 0);
/// ```
pub fn map_progress_to_frame(progress: f64, frame_count: usize) -> usize {
    if frame_count == 0 {
        return 0;
    }
    let last = frame_count - 1;
    let p = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
    let index = (p * last as f64).floor() as usize;
    index.min(last)
}

/// Whether the paint loop is running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaintState {
    /// No paint callbacks are being serviced
    #[default]
    Idle,
    /// Every paint callback maps progress and draws
    Playing,
}

/// When the paint loop ends on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Stop once the last frame has been drawn (time-driven playback)
    AtLastFrame,
    /// Keep running; progress may move either way (scroll-driven playback)
    Never,
}

/// The playback cursor of a single player.
///
/// Only the player's own paint callback mutates it.
#[derive(Clone, Debug)]
pub struct PlaybackState {
    /// Current frame index
    current_frame: usize,
    /// Total number of frames
    frame_count: usize,
    /// Paint loop state
    state: PaintState,
    /// When the loop ends by itself
    termination: Termination,
}

impl PlaybackState {
    /// Create a stopped cursor at frame 0.
    pub fn new(frame_count: usize, termination: Termination) -> Self {
        Self {
            current_frame: 0,
            frame_count,
            state: PaintState::Idle,
            termination,
        }
    }

    /// Get the total number of frames.
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Index of the last frame, or 0 for an empty sequence.
    #[inline]
    pub fn last_frame(&self) -> usize {
        self.frame_count.saturating_sub(1)
    }

    /// Get the current frame index.
    #[inline]
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    #[inline]
    pub fn state(&self) -> PaintState {
        self.state
    }

    #[inline]
    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Check if the paint loop is running.
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state == PaintState::Playing
    }

    /// Start servicing paint callbacks.
    pub fn play(&mut self) {
        if self.frame_count > 0 {
            self.state = PaintState::Playing;
        }
    }

    /// Stop servicing paint callbacks. The cursor stays where it is.
    pub fn stop(&mut self) {
        self.state = PaintState::Idle;
    }

    /// Rewind to frame 0 and play.
    pub fn restart(&mut self) {
        self.current_frame = 0;
        self.play();
    }

    /// Park on the last frame without playing.
    pub fn finish(&mut self) {
        self.current_frame = self.last_frame();
        self.state = PaintState::Idle;
    }

    /// Move the cursor to the frame for `progress`.
    ///
    /// Returns the new index. With `Termination::AtLastFrame`, reaching the
    /// last frame returns the loop to `Idle`.
    pub fn advance_to(&mut self, progress: f64) -> usize {
        self.current_frame = map_progress_to_frame(progress, self.frame_count);
        if self.termination == Termination::AtLastFrame && self.current_frame == self.last_frame() {
            self.state = PaintState::Idle;
        }
        self.current_frame
    }
}

/// Fixed-rate paint throttle for time-driven playback.
///
/// The display callback fires at the refresh rate; the clock lets through
/// one paint per interval and carries the remainder so the cadence doesn't
/// drift.
#[derive(Clone, Debug)]
pub struct FrameClock {
    /// Frames per second
    fps: u32,
    /// Timestamp of the last paint, in milliseconds
    last_ms: Option<f64>,
}

impl FrameClock {
    /// Create a new clock with the given FPS.
    pub fn new(fps: u32) -> Self {
        Self {
            fps: fps.max(1),
            last_ms: None,
        }
    }

    /// Get the current FPS.
    #[inline]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Get the interval in milliseconds between paints.
    #[inline]
    pub fn interval_ms(&self) -> f64 {
        1000.0 / self.fps as f64
    }

    /// Forget the last paint; the next `due` starts a fresh cadence at `now_ms`.
    pub fn reset(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }

    /// Whether a paint is due at `now_ms`. Records the paint when it is.
    pub fn due(&mut self, now_ms: f64) -> bool {
        let last = *self.last_ms.get_or_insert(now_ms);
        let delta = now_ms - last;
        let interval = self.interval_ms();
        if delta > interval {
            self.last_ms = Some(now_ms - (delta % interval));
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_mapping() {
        for n in 1..=240 {
            assert_eq!(map_progress_to_frame(0.0, n), 0);
            assert_eq!(map_progress_to_frame(1.0, n), n - 1);
        }
    }

    #[test]
    fn test_monotonic_mapping() {
        for n in [1usize, 2, 5, 7, 120, 1000] {
            let mut previous = 0;
            for step in 0..=10_000 {
                let p = step as f64 / 10_000.0;
                let index = map_progress_to_frame(p, n);
                assert!(index >= previous, "n={n} p={p}");
                assert!(index < n);
                previous = index;
            }
        }
    }

    #[test]
    fn test_clamping() {
        assert_eq!(map_progress_to_frame(-0.2, 120), 0);
        assert_eq!(map_progress_to_frame(1.4, 120), 119);
        assert_eq!(map_progress_to_frame(f64::NAN, 120), 0);
        assert_eq!(map_progress_to_frame(f64::INFINITY, 120), 119);
        assert_eq!(map_progress_to_frame(f64::NEG_INFINITY, 120), 0);
        assert_eq!(map_progress_to_frame(0.5, 0), 0);
    }

    #[test]
    fn test_quarter_steps_of_five() {
        let indices: Vec<usize> = [0.0, 0.25, 0.5, 0.75, 1.0]
            .iter()
            .map(|&p| map_progress_to_frame(p, 5))
            .collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_time_playback_goes_idle_at_end() {
        let mut state = PlaybackState::new(5, Termination::AtLastFrame);
        state.play();
        assert_eq!(state.advance_to(0.5), 2);
        assert!(state.is_playing());

        assert_eq!(state.advance_to(1.0), 4);
        assert_eq!(state.state(), PaintState::Idle);

        state.restart();
        assert_eq!(state.current_frame(), 0);
        assert!(state.is_playing());
    }

    #[test]
    fn test_scroll_playback_never_terminates() {
        let mut state = PlaybackState::new(5, Termination::Never);
        state.play();
        state.advance_to(1.0);
        assert!(state.is_playing());
        assert_eq!(state.advance_to(0.3), 1);
        assert!(state.is_playing());
    }

    #[test]
    fn test_empty_sequence_never_plays() {
        let mut state = PlaybackState::new(0, Termination::Never);
        state.play();
        assert_eq!(state.state(), PaintState::Idle);
    }

    #[test]
    fn test_finish_parks_on_last_frame() {
        let mut state = PlaybackState::new(120, Termination::AtLastFrame);
        state.finish();
        assert_eq!(state.current_frame(), 119);
        assert!(!state.is_playing());
    }

    #[test]
    fn test_frame_clock_throttles() {
        let mut clock = FrameClock::new(30);
        assert!((clock.interval_ms() - 33.333).abs() < 0.001);

        clock.reset(0.0);
        assert!(!clock.due(16.0));
        assert!(!clock.due(33.0));
        assert!(clock.due(40.0));
        // Remainder carried: last paint recorded at 40 - (40 % 33.33) = 33.33
        assert!(!clock.due(60.0));
        assert!(clock.due(67.0));
    }

    #[test]
    fn test_frame_clock_first_call_anchors() {
        let mut clock = FrameClock::new(60);
        assert!(!clock.due(1000.0));
        assert!(clock.due(1017.0));
    }
}
