//! The frame-sequence player.
//!
//! Owns the loaded frames, the canvas surface and the playback cursor, and
//! turns progress (from elapsed time or scroll position) into exactly one
//! drawn frame per paint.

use crate::{
    load_frames, Canvas2d, CanvasSurface, CriticalDamper, DriveMode, ElapsedProgress, FrameClock, FrameFetcher, FrameSet, Liveness, LoadPhase, PaintState, PlaybackState, PlayerConfig, PlayerResult, ProgressDrive, ScrollProgress, SurfaceSize, Termination,
};

/// Scroll/time-synchronized image sequence player.
///
/// All methods are meant to be called from a single thread of control (the
/// UI event loop). Failures never escape: fetch errors become skipped
/// frames, surface errors turn the player into a no-op.
///
/// ## Example
///
/// ```rust
/// use scrolly_frames::{FrameSequencePlayer, FrameSet, LoadResult, PlayerConfig, RasterCanvas, SurfaceSize};
///
/// let mut config = PlayerConfig::default();
/// config.source.frame_count = 2;
///
/// let mut player = FrameSequencePlayer::new(config, false).unwrap();
/// player.mount(Ok(RasterCanvas::new()), SurfaceSize::new(64.0, 36.0, 2.0));
///
/// let frame = image::RgbaImage::new(16, 9);
/// player.install_frames(FrameSet::from_outcomes(vec![
///     LoadResult::Loaded(frame.clone()),
///     LoadResult::Loaded(frame),
/// ]));
///
/// assert_eq!(player.tick(0.0), Some(0));
/// ```
pub struct FrameSequencePlayer<C: Canvas2d> {
    config: PlayerConfig,
    surface: Option<CanvasSurface<C>>,
    frames: Option<FrameSet<C::Image>>,
    phase: LoadPhase,
    playback: PlaybackState,
    clock: FrameClock,
    drive: ProgressDrive,
    has_played_before: bool,
    /// Time-driven playback waiting for its first tick to anchor the clock
    restart_pending: bool,
    /// Frame whose content is on screen
    displayed: Option<usize>,
    progress: f64,
    liveness: Liveness,
}

impl<C: Canvas2d> FrameSequencePlayer<C> {
    /// Create an unmounted, unloaded player.
    ///
    /// `has_played_before` comes from whoever remembers past sessions; when
    /// set, time-driven playback opens on its last frame instead of replaying.
    pub fn new(config: PlayerConfig, has_played_before: bool) -> PlayerResult<Self> {
        config.validate()?;
        let frame_count = config.source.frame_count;

        let (drive, termination) = match config.drive {
            DriveMode::Time => (
                ProgressDrive::Elapsed(ElapsedProgress::for_sequence(frame_count, config.fps)),
                Termination::AtLastFrame,
            ),
            DriveMode::Scroll => (
                ProgressDrive::Scroll(ScrollProgress::new(config.scroll_smoothing.map(CriticalDamper::new))),
                Termination::Never,
            ),
        };

        Ok(Self {
            clock: FrameClock::new(config.fps),
            playback: PlaybackState::new(frame_count, termination),
            config,
            surface: None,
            frames: None,
            phase: LoadPhase::Unloaded,
            drive,
            has_played_before,
            restart_pending: false,
            displayed: None,
            progress: 0.0,
            liveness: Liveness::new(),
        })
    }

    /// Attach a canvas and configure it for `size`.
    ///
    /// If the canvas could not be obtained or configured, the error is logged
    /// and the player keeps running without drawing anything.
    pub fn mount(&mut self, canvas: PlayerResult<C>, size: SurfaceSize) {
        if !self.liveness.is_alive() {
            return;
        }
        self.surface = match canvas.and_then(|c| CanvasSurface::new(c, size)) {
            Ok(surface) => Some(surface),
            Err(err) => {
                tracing::warn!(error = %err, "canvas unavailable, player disabled");
                None
            }
        };
        self.repaint();
    }

    /// Reconfigure the surface after the container changed size.
    pub fn resize(&mut self, size: SurfaceSize) {
        let Some(surface) = &mut self.surface else {
            return;
        };
        if let Err(err) = surface.configure(size) {
            tracing::warn!(error = %err, "failed to reconfigure canvas, player disabled");
            self.surface = None;
            return;
        }
        self.repaint();
    }

    /// Fetch the configured sequence and install it.
    ///
    /// Holds `&mut self` across the load; callers sharing the player through
    /// a `RefCell` should use [`load_frames`] with [`Self::begin_loading`]
    /// and [`Self::install_frames`] instead.
    pub async fn load<F>(&mut self, fetcher: &F) -> LoadPhase where F: FrameFetcher<Image = C::Image> {
        self.begin_loading();
        let frames = load_frames(fetcher, &self.config.source).await;
        self.install_frames(frames);
        self.phase
    }

    /// Mark the sequence as in flight.
    pub fn begin_loading(&mut self) {
        if self.liveness.is_alive() && self.phase == LoadPhase::Unloaded {
            self.phase = LoadPhase::Loading;
        }
    }

    /// Take ownership of a settled frame set and start playback.
    ///
    /// Returns `false` (and drops the set) when the player was unmounted
    /// while the load was in flight.
    pub fn install_frames(&mut self, frames: FrameSet<C::Image>) -> bool {
        if !self.liveness.is_alive() {
            tracing::debug!("player unmounted, discarding loaded frames");
            return false;
        }
        if frames.len() != self.playback.frame_count() {
            tracing::warn!(expected = self.playback.frame_count(), actual = frames.len(), "frame set length differs from configuration");
            self.playback = PlaybackState::new(frames.len(), self.playback.termination());
        }

        self.phase = LoadPhase::for_ready_count(frames.ready_count());
        let failed = frames.len() - frames.ready_count();
        self.frames = Some(frames);
        self.displayed = None;

        if self.phase == LoadPhase::ReadyEmpty {
            tracing::warn!("no frames loaded, showing placeholder");
            self.playback.stop();
            self.repaint();
            return true;
        }
        if failed > 0 {
            tracing::debug!(failed, "sequence ready with gaps");
        }

        if let ProgressDrive::Scroll(scroll) = &mut self.drive {
            let target = scroll.target();
            scroll.reset(target);
            self.playback.play();
            self.present(target);
        } else if self.has_played_before {
            self.playback.finish();
            self.progress = 1.0;
            self.show_last_loaded();
        } else {
            self.playback.restart();
            self.restart_pending = true;
        }
        true
    }

    /// Paint-loop callback, once per display refresh.
    ///
    /// Returns the frame on screen after the tick when anything was drawn
    /// or re-evaluated, None when the tick was skipped.
    pub fn tick(&mut self, now_ms: f64) -> Option<usize> {
        if !self.can_paint() || !self.playback.is_playing() {
            return None;
        }

        if self.drive.is_time_based() {
            if self.restart_pending {
                self.restart_pending = false;
                self.drive.restart(now_ms);
                self.clock.reset(now_ms);
            } else if !self.clock.due(now_ms) {
                return None;
            }
        }

        let progress = self.drive.sample(now_ms);
        if self.drive.is_time_based() {
            self.progress = progress;
        }
        self.present(progress)
    }

    /// Feed a new scroll progress value.
    ///
    /// Each value is mapped on its own; going backwards is fine. With
    /// smoothing enabled the value becomes the spring target and is drawn
    /// on subsequent ticks. [`Self::progress`] reports the value as given,
    /// whether or not anything can be drawn yet.
    pub fn set_scroll_progress(&mut self, progress: f64) -> Option<usize> {
        let ProgressDrive::Scroll(scroll) = &mut self.drive else {
            tracing::trace!(progress, "scroll input ignored by time-driven player");
            return None;
        };
        self.progress = progress;
        scroll.set_target(progress);
        let smoothed = scroll.is_smoothed();
        if smoothed || !self.can_paint() || !self.playback.is_playing() {
            return None;
        }
        self.present(progress)
    }

    /// Start over from the first frame, e.g. when the view re-enters the viewport.
    ///
    /// Only meaningful for time-driven playback; scroll position alone
    /// decides what a scroll-driven player shows.
    pub fn replay(&mut self, now_ms: f64) -> Option<usize> {
        if !self.can_paint() || !self.drive.is_time_based() {
            return None;
        }
        self.restart_pending = false;
        self.playback.restart();
        self.drive.restart(now_ms);
        self.clock.reset(now_ms);
        self.progress = 0.0;
        self.present(0.0)
    }

    /// Stop painting and detach from the surface.
    ///
    /// Loads still in flight see the revoked liveness flag and drop their results.
    pub fn unmount(&mut self) {
        self.liveness.revoke();
        self.playback.stop();
        self.surface = None;
        tracing::debug!("player unmounted");
    }

    /// A handle in-flight loads check before installing their result.
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.liveness.is_alive()
    }

    #[inline]
    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    #[inline]
    pub fn paint_state(&self) -> PaintState {
        self.playback.state()
    }

    /// Frame index the cursor points at (may be a skipped gap).
    #[inline]
    pub fn current_frame(&self) -> usize {
        self.playback.current_frame()
    }

    /// Frame whose content is currently on screen.
    #[inline]
    pub fn displayed_frame(&self) -> Option<usize> {
        self.displayed
    }

    /// The latest progress value, unmodified, for overlays that follow playback.
    ///
    /// Scroll input is reported as received (before clamping or smoothing);
    /// time-driven playback reports elapsed progress.
    #[inline]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[inline]
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    #[inline]
    pub fn frames(&self) -> Option<&FrameSet<C::Image>> {
        self.frames.as_ref()
    }

    #[inline]
    pub fn surface(&self) -> Option<&CanvasSurface<C>> {
        self.surface.as_ref()
    }

    fn can_paint(&self) -> bool {
        self.liveness.is_alive() && self.surface.is_some() && self.phase == LoadPhase::Ready
    }

    /// Map `progress` to a frame and draw it if it isn't already showing.
    fn present(&mut self, progress: f64) -> Option<usize> {
        let index = self.playback.advance_to(progress);
        if self.displayed != Some(index) {
            self.draw(index);
        }
        self.displayed
    }

    fn draw(&mut self, index: usize) {
        let (Some(surface), Some(frames)) = (&mut self.surface, &self.frames) else {
            return;
        };
        if surface.render_frame(frames, index) {
            self.displayed = Some(index);
        }
    }

    /// Draw the last frame that loaded, for a player parked at the end.
    fn show_last_loaded(&mut self) {
        let last = self.playback.last_frame();
        let Some(index) = self.frames.as_ref().and_then(|f| f.last_loaded_at_or_before(last)) else {
            return;
        };
        if index != last {
            tracing::debug!(last, shown = index, "last frame missing, showing nearest earlier frame");
        }
        self.displayed = None;
        self.draw(index);
    }

    /// Redraw after the backing store was reset.
    fn repaint(&mut self) {
        match self.phase {
            LoadPhase::ReadyEmpty => {
                let color = self.config.background_color();
                if let Some(surface) = &mut self.surface {
                    surface.paint_placeholder(color);
                }
            }
            LoadPhase::Ready => {
                let index = self.displayed.unwrap_or_else(|| self.playback.current_frame());
                self.displayed = None;
                self.draw(index);
            }
            LoadPhase::Unloaded | LoadPhase::Loading => {}
        }
    }
}

/// Browser glue: mounting on a `<canvas>` and driving `requestAnimationFrame`.
#[cfg(feature = "web")]
pub mod web {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;
    use web_sys::HtmlCanvasElement;

    use super::FrameSequencePlayer;
    use crate::render::web::{surface_size_of, WebCanvas};
    use crate::{load_frames, ImageElementFetcher, PlayerConfig, PlayerResult};

    pub type SharedPlayer = Rc<RefCell<FrameSequencePlayer<WebCanvas>>>;

    /// Create a player on `element` and start loading its frames in the background.
    pub fn mount_canvas(element: HtmlCanvasElement, config: PlayerConfig, has_played_before: bool) -> PlayerResult<SharedPlayer> {
        let size = surface_size_of(&element);
        let player = Rc::new(RefCell::new(FrameSequencePlayer::new(config, has_played_before)?));

        let (source, liveness) = {
            let mut p = player.borrow_mut();
            p.mount(WebCanvas::from_element(element), size);
            p.begin_loading();
            (p.config().source.clone(), p.liveness())
        };

        let task_player = Rc::clone(&player);
        wasm_bindgen_futures::spawn_local(async move {
            let frames = load_frames(&ImageElementFetcher, &source).await;
            if liveness.is_alive() {
                task_player.borrow_mut().install_frames(frames);
            }
        });

        Ok(player)
    }

    /// Re-measure the canvas and reconfigure the surface, for resize events.
    pub fn resize_to_canvas(player: &SharedPlayer) {
        let size = match player.borrow().surface() {
            Some(surface) => surface_size_of(surface.canvas().element()),
            None => return,
        };
        player.borrow_mut().resize(size);
    }

    /// A running `requestAnimationFrame` loop ticking one player.
    ///
    /// The loop ends when the player is unmounted or the handle is stopped/dropped.
    pub struct AnimationLoop {
        request_id: Rc<Cell<Option<i32>>>,
        callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    }

    impl AnimationLoop {
        pub fn start(player: SharedPlayer) -> PlayerResult<Self> {
            let window = web_sys::window().ok_or_else(|| crate::PlayerError::surface("no window available"))?;
            let request_id = Rc::new(Cell::new(None));
            let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));

            let next_id = Rc::clone(&request_id);
            let next_callback = Rc::clone(&callback);
            let closure = Closure::wrap(Box::new(move |now: f64| {
                let alive = {
                    let mut p = player.borrow_mut();
                    p.tick(now);
                    p.is_alive()
                };
                next_id.set(None);
                if !alive {
                    return;
                }
                if let (Some(window), Some(cb)) = (web_sys::window(), next_callback.borrow().as_ref()) {
                    next_id.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
                }
            }) as Box<dyn FnMut(f64)>);

            let id = window
                .request_animation_frame(closure.as_ref().unchecked_ref())
                .map_err(|_| crate::PlayerError::surface("requestAnimationFrame failed"))?;
            request_id.set(Some(id));
            *callback.borrow_mut() = Some(closure);

            Ok(Self { request_id, callback })
        }

        /// Cancel the pending callback and release the closure.
        pub fn stop(&self) {
            if let (Some(id), Some(window)) = (self.request_id.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
            self.callback.borrow_mut().take();
        }
    }

    impl Drop for AnimationLoop {
        fn drop(&mut self) {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LoadResult, PlayerError, RasterCanvas};

    fn solid(value: u8) -> image::RgbaImage {
        image::RgbaImage::from_pixel(4, 4, image::Rgba([value, 0, 0, 255]))
    }

    fn frames(count: usize, failed: &[usize]) -> FrameSet<image::RgbaImage> {
        FrameSet::from_outcomes(
            (0..count)
                .map(|i| {
                    if failed.contains(&i) {
                        LoadResult::Failed
                    } else {
                        LoadResult::Loaded(solid(i as u8 * 10 + 10))
                    }
                })
                .collect(),
        )
    }

    fn config(count: usize, drive: DriveMode) -> PlayerConfig {
        let mut config = PlayerConfig {
            drive,
            ..Default::default()
        };
        config.source.frame_count = count;
        config
    }

    fn mounted(count: usize, drive: DriveMode, has_played_before: bool) -> FrameSequencePlayer<RasterCanvas> {
        let mut player = FrameSequencePlayer::new(config(count, drive), has_played_before).unwrap();
        player.mount(Ok(RasterCanvas::new()), SurfaceSize::new(8.0, 8.0, 1.0));
        player
    }

    fn shown(player: &FrameSequencePlayer<RasterCanvas>) -> u8 {
        player.surface().unwrap().canvas().pixel(4, 4).unwrap()[0]
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = FrameSequencePlayer::<RasterCanvas>::new(config(0, DriveMode::Time), false);
        assert!(matches!(result.err(), Some(PlayerError::Config(_))));
    }

    #[test]
    fn test_scroll_partial_failure_holds_previous_frame() {
        let mut player = mounted(10, DriveMode::Scroll, false);
        player.install_frames(frames(10, &[3, 7]));
        assert_eq!(player.phase(), LoadPhase::Ready);

        // 2/9 of the way maps to frame 2
        assert_eq!(player.set_scroll_progress(2.0 / 9.0 + 1e-9), Some(2));
        assert_eq!(shown(&player), 30);

        // frame 3 failed: cursor moves, screen doesn't
        assert_eq!(player.set_scroll_progress(3.0 / 9.0 + 1e-9), Some(2));
        assert_eq!(player.current_frame(), 3);
        assert_eq!(shown(&player), 30);

        // backwards is fine
        assert_eq!(player.set_scroll_progress(0.0), Some(0));
        assert_eq!(shown(&player), 10);
    }

    #[test]
    fn test_total_failure_shows_placeholder() {
        let mut player = mounted(3, DriveMode::Scroll, false);
        player.install_frames(frames(3, &[0, 1, 2]));

        assert_eq!(player.phase(), LoadPhase::ReadyEmpty);
        assert_eq!(player.set_scroll_progress(0.5), None);
        assert_eq!(player.tick(16.0), None);
        assert_eq!(player.displayed_frame(), None);
        assert_eq!(
            player.surface().unwrap().canvas().pixel(0, 0),
            Some(player.config().background_color().to_rgba())
        );
    }

    #[test]
    fn test_time_playback_runs_once_and_goes_idle() {
        let mut player = mounted(4, DriveMode::Time, false);
        player.install_frames(frames(4, &[]));
        assert_eq!(player.paint_state(), PaintState::Playing);

        // 30 fps: frame k at k * 33.3ms
        assert_eq!(player.tick(1000.0), Some(0));
        assert_eq!(player.tick(1010.0), None); // throttled
        assert_eq!(player.tick(1034.0), Some(1));
        assert_eq!(player.tick(1068.0), Some(2));
        assert_eq!(player.tick(1101.0), Some(3));
        assert_eq!(player.paint_state(), PaintState::Idle);
        assert_eq!(player.tick(2000.0), None);
        assert_eq!(shown(&player), 40);
    }

    #[test]
    fn test_replay_restarts_from_first_frame() {
        let mut player = mounted(4, DriveMode::Time, false);
        player.install_frames(frames(4, &[]));
        player.tick(0.0);
        player.tick(200.0);
        assert_eq!(player.paint_state(), PaintState::Idle);

        assert_eq!(player.replay(5000.0), Some(0));
        assert_eq!(shown(&player), 10);
        assert_eq!(player.paint_state(), PaintState::Playing);
        assert_eq!(player.tick(5034.0), Some(1));
    }

    #[test]
    fn test_has_played_before_opens_on_last_frame() {
        let mut player = mounted(5, DriveMode::Time, true);
        player.install_frames(frames(5, &[]));

        assert_eq!(player.paint_state(), PaintState::Idle);
        assert_eq!(player.displayed_frame(), Some(4));
        assert_eq!(player.progress(), 1.0);
        assert_eq!(player.tick(100.0), None);
    }

    #[test]
    fn test_has_played_before_falls_back_when_last_frame_missing() {
        let mut player = mounted(5, DriveMode::Time, true);
        player.install_frames(frames(5, &[4]));

        assert_eq!(player.paint_state(), PaintState::Idle);
        assert_eq!(player.current_frame(), 4);
        assert_eq!(player.displayed_frame(), Some(3));
        assert_eq!(shown(&player), 40);

        // resize keeps the fallback on screen
        player.resize(SurfaceSize::new(8.0, 8.0, 2.0));
        assert_eq!(player.displayed_frame(), Some(3));
    }

    #[test]
    fn test_progress_passes_through_before_ready() {
        let mut player = mounted(5, DriveMode::Scroll, false);
        player.begin_loading();
        assert_eq!(player.set_scroll_progress(0.75), None);
        assert_eq!(player.progress(), 0.75);

        player.install_frames(frames(5, &[0, 1, 2, 3, 4]));
        assert_eq!(player.phase(), LoadPhase::ReadyEmpty);
        assert_eq!(player.set_scroll_progress(0.9), None);
        assert_eq!(player.progress(), 0.9);

        // out-of-range input is reported as given
        player.set_scroll_progress(1.3);
        assert_eq!(player.progress(), 1.3);
    }

    #[test]
    fn test_progress_passes_through_without_canvas() {
        let mut player = FrameSequencePlayer::<RasterCanvas>::new(config(3, DriveMode::Scroll), false).unwrap();
        player.install_frames(frames(3, &[]));
        player.set_scroll_progress(0.4);
        assert_eq!(player.progress(), 0.4);
        assert_eq!(player.displayed_frame(), None);
    }

    #[test]
    fn test_smoothed_scroll_recovers_from_non_finite_input() {
        let mut cfg = config(5, DriveMode::Scroll);
        cfg.scroll_smoothing = Some(20.0);
        let mut player = FrameSequencePlayer::new(cfg, false).unwrap();
        player.mount(Ok(RasterCanvas::new()), SurfaceSize::new(8.0, 8.0, 1.0));
        player.install_frames(frames(5, &[]));

        player.set_scroll_progress(f64::INFINITY);
        player.tick(0.0);
        player.set_scroll_progress(f64::NAN);
        player.tick(16.0);
        player.set_scroll_progress(1.0);
        for i in 2..=200 {
            player.tick(i as f64 * 16.0);
        }
        assert_eq!(player.current_frame(), 4);
        assert_eq!(player.displayed_frame(), Some(4));
        assert_eq!(player.progress(), 1.0);
    }

    #[test]
    fn test_unmount_discards_late_frames() {
        let mut player = mounted(3, DriveMode::Scroll, false);
        player.begin_loading();
        assert_eq!(player.phase(), LoadPhase::Loading);

        let liveness = player.liveness();
        player.unmount();
        assert!(!liveness.is_alive());
        assert!(!player.install_frames(frames(3, &[])));
        assert_eq!(player.phase(), LoadPhase::Loading);
        assert!(player.surface().is_none());
        assert_eq!(player.tick(0.0), None);
    }

    #[test]
    fn test_missing_canvas_makes_player_noop() {
        let mut player = FrameSequencePlayer::<RasterCanvas>::new(config(3, DriveMode::Scroll), false).unwrap();
        player.mount(Err(PlayerError::surface("no 2d context available")), SurfaceSize::new(8.0, 8.0, 1.0));
        assert!(player.install_frames(frames(3, &[])));
        assert_eq!(player.set_scroll_progress(1.0), None);
        assert_eq!(player.tick(0.0), None);
        assert_eq!(player.displayed_frame(), None);
    }

    #[test]
    fn test_resize_redraws_current_frame() {
        let mut player = mounted(3, DriveMode::Scroll, false);
        player.install_frames(frames(3, &[]));
        player.set_scroll_progress(1.0);

        player.resize(SurfaceSize::new(20.0, 10.0, 2.0));
        let canvas = player.surface().unwrap().canvas();
        assert_eq!(canvas.backing_size(), (40, 20));
        assert_eq!(canvas.pixel(39, 19).unwrap()[0], 30);
        assert_eq!(player.displayed_frame(), Some(2));
    }

    #[test]
    fn test_scroll_before_ready_applies_on_install() {
        let mut player = mounted(5, DriveMode::Scroll, false);
        assert_eq!(player.set_scroll_progress(0.75), None);
        player.install_frames(frames(5, &[]));
        assert_eq!(player.displayed_frame(), Some(3));
    }

    #[test]
    fn test_smoothed_scroll_converges_on_ticks() {
        let mut cfg = config(5, DriveMode::Scroll);
        cfg.scroll_smoothing = Some(20.0);
        let mut player = FrameSequencePlayer::new(cfg, false).unwrap();
        player.mount(Ok(RasterCanvas::new()), SurfaceSize::new(8.0, 8.0, 1.0));
        player.install_frames(frames(5, &[]));
        assert_eq!(player.displayed_frame(), Some(0));

        assert_eq!(player.set_scroll_progress(1.0), None);
        let mut last = 0;
        for i in 0..=120 {
            if let Some(index) = player.tick(i as f64 * 16.0) {
                assert!(index >= last);
                last = index;
            }
        }
        assert_eq!(player.displayed_frame(), Some(4));
        assert_eq!(player.progress(), 1.0);
    }

    #[test]
    fn test_load_through_fetcher() {
        struct Fixed;
        impl FrameFetcher for Fixed {
            type Image = image::RgbaImage;
            async fn fetch(&self, uri: &str) -> PlayerResult<image::RgbaImage> {
                if uri.ends_with("001.webp") {
                    Err(PlayerError::fetch(uri, "404"))
                } else {
                    Ok(solid(99))
                }
            }
        }

        let mut player = mounted(3, DriveMode::Time, false);
        let phase = futures::executor::block_on(player.load(&Fixed));
        assert_eq!(phase, LoadPhase::Ready);
        assert_eq!(player.frames().map(|f| f.failed_indices()), Some(vec![1]));
    }
}
