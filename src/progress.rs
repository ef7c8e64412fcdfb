//! Progress sources: elapsed time, scroll position through a pinned
//! container, and critically damped smoothing.

/// Progress driven by wall-clock time since playback started.
#[derive(Clone, Debug)]
pub struct ElapsedProgress {
    started_at_ms: Option<f64>,
    duration_ms: f64,
}

impl ElapsedProgress {
    /// Create a source that reaches 1.0 after `duration_ms`.
    pub fn new(duration_ms: f64) -> Self {
        Self {
            started_at_ms: None,
            duration_ms: duration_ms.max(0.0),
        }
    }

    /// Duration that shows frame `k` of `frame_count` at `k` paint intervals.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use scrolly_frames::ElapsedProgress;
    ///
    /// // 120 frames at 30 fps: the last frame appears after 119 intervals
    /// let source = ElapsedProgress::for_sequence(120, 30);
    /// assert!((source.duration_ms() - 119.0 * 1000.0 / 30.0).abs() < 1e-9);
    /// ```
    pub fn for_sequence(frame_count: usize, fps: u32) -> Self {
        let interval = 1000.0 / fps.max(1) as f64;
        Self::new(frame_count.saturating_sub(1) as f64 * interval)
    }

    #[inline]
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Start (or start over) at `now_ms`.
    pub fn restart(&mut self, now_ms: f64) {
        self.started_at_ms = Some(now_ms);
    }

    /// Progress at `now_ms`. The first sample anchors the start time.
    pub fn sample(&mut self, now_ms: f64) -> f64 {
        let start = *self.started_at_ms.get_or_insert(now_ms);
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - start) / self.duration_ms).clamp(0.0, 1.0)
    }
}

/// Layout snapshot of a pinned (sticky) scroll container.
///
/// Progress runs from 0 when the container's top reaches the top of the
/// viewport to 1 when its bottom reaches the bottom of the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollLayout {
    /// Document offset of the container's top edge
    pub container_top: f64,
    /// Full height of the container (the pinned track)
    pub container_height: f64,
    /// Height of the viewport
    pub viewport_height: f64,
    /// Current document scroll offset
    pub scroll_y: f64,
}

impl ScrollLayout {
    /// Normalized progress through the container, clamped to `[0, 1]`.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use scrolly_frames::ScrollLayout;
    ///
    /// let layout = ScrollLayout {
    ///     container_top: 0.0,
    ///     container_height: 4000.0,
    ///     viewport_height: 1000.0,
    ///     scroll_y: 1500.0,
    /// };
    /// assert_eq!(layout.progress(), 0.5);
    /// ```
    pub fn progress(&self) -> f64 {
        let travelled = self.scroll_y - self.container_top;
        let track = self.container_height - self.viewport_height;
        if !travelled.is_finite() || !track.is_finite() {
            return 0.0;
        }
        if track <= 0.0 {
            return if travelled > 0.0 { 1.0 } else { 0.0 };
        }
        (travelled / track).clamp(0.0, 1.0)
    }
}

/// Critically damped spring toward a moving target.
///
/// Smooths jittery scroll input without overshoot, so a monotonic target
/// produces a monotonic output.
#[derive(Clone, Debug)]
pub struct CriticalDamper {
    /// Natural angular frequency (rad/s); higher settles faster
    omega: f64,
    value: f64,
    velocity: f64,
    target: f64,
    last_ms: Option<f64>,
}

impl CriticalDamper {
    /// Distance from the target below which the spring snaps to it.
    const REST_EPSILON: f64 = 1e-4;

    pub fn new(omega: f64) -> Self {
        Self {
            omega: if omega.is_finite() && omega > 0.0 { omega } else { 1.0 },
            value: 0.0,
            velocity: 0.0,
            target: 0.0,
            last_ms: None,
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Move the target. Non-finite targets are ignored so the spring state
    /// stays finite.
    pub fn set_target(&mut self, target: f64) {
        if target.is_finite() {
            self.target = target;
        }
    }

    /// Jump straight to `value` with no motion.
    pub fn snap(&mut self, value: f64) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// True once the spring has settled on its target.
    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < Self::REST_EPSILON && self.velocity.abs() < Self::REST_EPSILON
    }

    /// Advance the spring to `now_ms` and return the smoothed value.
    ///
    /// Uses the closed-form critically damped solution, so the step is
    /// exact for any frame time.
    pub fn step(&mut self, now_ms: f64) -> f64 {
        let last = *self.last_ms.get_or_insert(now_ms);
        let dt = ((now_ms - last) / 1000.0).max(0.0);
        self.last_ms = Some(now_ms);
        if dt == 0.0 {
            return self.value;
        }

        let x0 = self.value - self.target;
        let v0 = self.velocity;
        let w = self.omega;
        let decay = (-w * dt).exp();
        let c = v0 + w * x0;

        let x = (x0 + c * dt) * decay;
        self.velocity = (v0 - w * c * dt) * decay;
        self.value = self.target + x;

        if self.is_settled() {
            self.snap(self.target);
        }
        self.value
    }
}

/// Scroll-driven progress, optionally smoothed.
#[derive(Clone, Debug)]
pub struct ScrollProgress {
    target: f64,
    damper: Option<CriticalDamper>,
}

impl ScrollProgress {
    pub fn new(damper: Option<CriticalDamper>) -> Self {
        Self { target: 0.0, damper }
    }

    /// Record a new raw scroll progress value.
    ///
    /// Values are clamped to `[0, 1]`; NaN keeps the previous target.
    pub fn set_target(&mut self, progress: f64) {
        let progress = self.sanitize(progress);
        self.target = progress;
        if let Some(damper) = &mut self.damper {
            damper.set_target(progress);
        }
    }

    /// The latest raw (unsmoothed) progress.
    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    pub fn is_smoothed(&self) -> bool {
        self.damper.is_some()
    }

    fn sanitize(&self, progress: f64) -> f64 {
        if progress.is_nan() {
            self.target
        } else {
            progress.clamp(0.0, 1.0)
        }
    }

    pub fn sample(&mut self, now_ms: f64) -> f64 {
        match &mut self.damper {
            Some(damper) => damper.step(now_ms),
            None => self.target,
        }
    }

    /// Jump to `progress`, dropping any in-flight smoothing.
    pub fn reset(&mut self, progress: f64) {
        let progress = self.sanitize(progress);
        self.target = progress;
        if let Some(damper) = &mut self.damper {
            damper.snap(progress);
        }
    }
}

/// The mechanism producing progress for a player.
#[derive(Clone, Debug)]
pub enum ProgressDrive {
    /// Time since start; playback ends at the last frame
    Elapsed(ElapsedProgress),
    /// Scroll position; playback never ends
    Scroll(ScrollProgress),
}

impl ProgressDrive {
    pub fn sample(&mut self, now_ms: f64) -> f64 {
        match self {
            ProgressDrive::Elapsed(elapsed) => elapsed.sample(now_ms),
            ProgressDrive::Scroll(scroll) => scroll.sample(now_ms),
        }
    }

    pub fn restart(&mut self, now_ms: f64) {
        match self {
            ProgressDrive::Elapsed(elapsed) => elapsed.restart(now_ms),
            ProgressDrive::Scroll(scroll) => scroll.reset(0.0),
        }
    }

    #[inline]
    pub fn is_time_based(&self) -> bool {
        matches!(self, ProgressDrive::Elapsed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_progress() {
        let mut source = ElapsedProgress::new(1000.0);
        source.restart(500.0);
        assert_eq!(source.sample(500.0), 0.0);
        assert_eq!(source.sample(1000.0), 0.5);
        assert_eq!(source.sample(1500.0), 1.0);
        assert_eq!(source.sample(9000.0), 1.0);
        assert_eq!(source.sample(0.0), 0.0);
    }

    #[test]
    fn test_elapsed_first_sample_anchors() {
        let mut source = ElapsedProgress::new(100.0);
        assert_eq!(source.sample(42.0), 0.0);
        assert_eq!(source.sample(92.0), 0.5);
    }

    #[test]
    fn test_elapsed_zero_duration_is_complete() {
        let mut source = ElapsedProgress::for_sequence(1, 30);
        assert_eq!(source.sample(0.0), 1.0);
    }

    #[test]
    fn test_scroll_layout_progress() {
        let mut layout = ScrollLayout {
            container_top: 1000.0,
            container_height: 3000.0,
            viewport_height: 1000.0,
            scroll_y: 0.0,
        };
        assert_eq!(layout.progress(), 0.0);

        layout.scroll_y = 2000.0;
        assert_eq!(layout.progress(), 0.5);

        layout.scroll_y = 5000.0;
        assert_eq!(layout.progress(), 1.0);
    }

    #[test]
    fn test_scroll_layout_short_container() {
        let mut layout = ScrollLayout {
            container_top: 100.0,
            container_height: 500.0,
            viewport_height: 800.0,
            scroll_y: 50.0,
        };
        assert_eq!(layout.progress(), 0.0);
        layout.scroll_y = 150.0;
        assert_eq!(layout.progress(), 1.0);
    }

    #[test]
    fn test_damper_is_monotonic_and_settles() {
        let mut damper = CriticalDamper::new(12.0);
        damper.step(0.0);
        damper.set_target(1.0);

        let mut previous = damper.value();
        for i in 1..=200 {
            let value = damper.step(i as f64 * 16.0);
            assert!(value >= previous - 1e-12, "step {i}");
            assert!(value <= 1.0 + 1e-12, "overshoot at step {i}");
            previous = value;
        }
        assert!(damper.is_settled());
        assert_eq!(damper.value(), 1.0);
    }

    #[test]
    fn test_scroll_progress_without_smoothing_passes_through() {
        let mut scroll = ScrollProgress::new(None);
        scroll.set_target(0.7);
        assert_eq!(scroll.sample(0.0), 0.7);
        scroll.set_target(0.2);
        assert_eq!(scroll.sample(1.0), 0.2);
    }

    #[test]
    fn test_scroll_progress_sanitizes_targets() {
        let mut scroll = ScrollProgress::new(Some(CriticalDamper::new(20.0)));
        scroll.sample(0.0);
        scroll.set_target(f64::INFINITY);
        assert_eq!(scroll.target(), 1.0);
        scroll.set_target(f64::NAN);
        assert_eq!(scroll.target(), 1.0);
        scroll.set_target(-4.0);
        assert_eq!(scroll.target(), 0.0);

        scroll.set_target(0.5);
        let mut value = 0.0;
        for i in 1..=200 {
            value = scroll.sample(i as f64 * 16.0);
            assert!(value.is_finite(), "step {i}");
        }
        assert_eq!(value, 0.5);
    }

    #[test]
    fn test_damper_ignores_non_finite_target() {
        let mut damper = CriticalDamper::new(10.0);
        damper.set_target(0.25);
        damper.set_target(f64::NAN);
        damper.set_target(f64::NEG_INFINITY);
        assert_eq!(damper.target(), 0.25);
    }

    #[test]
    fn test_drive_restart() {
        let mut drive = ProgressDrive::Elapsed(ElapsedProgress::new(100.0));
        drive.restart(0.0);
        assert_eq!(drive.sample(100.0), 1.0);
        drive.restart(100.0);
        assert_eq!(drive.sample(150.0), 0.5);
        assert!(drive.is_time_based());
    }
}
