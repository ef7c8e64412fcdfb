//! Frame loading utilities and state management.
//!
//! Every frame of a sequence is fetched concurrently and the results are
//! joined with a wait-for-all combinator: one failed frame never aborts
//! the others, it just leaves a `Failed` slot behind.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::path::PathBuf;
use std::rc::Rc;

use futures::future::join_all;

use crate::{FrameImage, FrameSet, FrameSource, LoadResult, PlayerError, PlayerResult};

/// Loading phase indicator
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadPhase {
    /// Nothing requested yet
    #[default]
    Unloaded,
    /// Fetches in flight
    Loading,
    /// Settled with at least one frame
    Ready,
    /// Settled with zero frames; terminal
    ReadyEmpty,
}

impl LoadPhase {
    /// The terminal phase for a settled sequence with `ready_count` frames.
    pub fn for_ready_count(ready_count: usize) -> Self {
        if ready_count == 0 {
            LoadPhase::ReadyEmpty
        } else {
            LoadPhase::Ready
        }
    }

    /// True once every fetch has settled.
    #[inline]
    pub fn is_settled(&self) -> bool {
        matches!(self, LoadPhase::Ready | LoadPhase::ReadyEmpty)
    }
}

/// Progress information for frame loading
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadingProgress {
    /// Number of frames loaded
    pub loaded: usize,
    /// Number of frames whose fetch failed
    pub failed: usize,
    /// Total number of frames to load
    pub total: usize,
}

impl LoadingProgress {
    /// Create a new loading progress tracker
    pub fn new(total: usize) -> Self {
        Self {
            loaded: 0,
            failed: 0,
            total,
        }
    }

    /// Number of fetches that have finished either way.
    #[inline]
    pub fn settled(&self) -> usize {
        self.loaded + self.failed
    }

    /// Get loading percentage (0-100), counting failures as settled
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            0
        } else {
            ((self.settled() as f32 / self.total as f32) * 100.0) as u8
        }
    }

    /// Check if every fetch has settled
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.settled() >= self.total
    }

    /// Format loading message
    pub fn message(&self) -> String {
        if self.total > 0 {
            format!("Loading frames... {} / {} ({}%)", self.settled(), self.total, self.percent())
        } else {
            "Loading frames...".to_string()
        }
    }
}

/// Trait for async frame fetchers.
///
/// Implement this trait to fetch and decode frames with your specific I/O
/// mechanism (fetch API, filesystem, embedded bytes, etc.).
///
/// No `Send` bounds, so it works in WASM (single-threaded) contexts as well as native ones.
pub trait FrameFetcher {
    /// Decoded image type produced by this fetcher
    type Image: FrameImage;

    /// Fetch and decode the frame at `uri`.
    fn fetch(&self, uri: &str) -> impl Future<Output = PlayerResult<Self::Image>>;
}

/// Load every frame of `source` concurrently and wait for all to settle.
///
/// Never fails: each fetch error is logged and recorded as `Failed`.
pub async fn load_frames<F: FrameFetcher>(fetcher: &F, source: &FrameSource) -> FrameSet<F::Image> {
    load_frames_with_progress(fetcher, source, |_| {}).await
}

/// Like [`load_frames`], reporting a progress snapshot after every settled fetch.
#[tracing::instrument(level = "debug", skip_all, fields(frames = source.frame_count, base = %source.base_dir))]
pub async fn load_frames_with_progress<F, P>(fetcher: &F, source: &FrameSource, on_settle: P) -> FrameSet<F::Image> where F: FrameFetcher, P: Fn(&LoadingProgress) {
    let progress = RefCell::new(LoadingProgress::new(source.frame_count));
    tracing::debug!("loading frame sequence");

    let fetches = source.uris().map(|uri| {
        let progress = &progress;
        let on_settle = &on_settle;
        async move {
            let outcome = match fetcher.fetch(&uri).await {
                Ok(image) => LoadResult::Loaded(image),
                Err(err) => {
                    tracing::warn!(%uri, error = %err, "frame failed to load");
                    LoadResult::Failed
                }
            };

            let snapshot = {
                let mut p = progress.borrow_mut();
                if outcome.is_loaded() {
                    p.loaded += 1;
                } else {
                    p.failed += 1;
                }
                p.clone()
            };
            on_settle(&snapshot);
            outcome
        }
    });

    // join_all keeps input order, so slot i holds the outcome of fetch i.
    let set = FrameSet::from_outcomes(join_all(fetches).await);
    tracing::debug!(ready = set.ready_count(), total = set.len(), "frame sequence settled");
    set
}

/// Shared liveness flag between a player and its in-flight loads.
///
/// Cloning shares the flag. Once [`Liveness::revoke`] is called, results
/// that arrive late must be dropped instead of touching the surface.
#[derive(Clone, Debug)]
pub struct Liveness(Rc<Cell<bool>>);

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    pub fn revoke(&self) {
        self.0.set(false);
    }
}

/// Fetcher reading frames from a directory and decoding them with `image`.
///
/// URIs are resolved relative to `root`; a leading `/` is ignored so web
/// paths like `/sequence/000.webp` map onto `{root}/sequence/000.webp`.
///
/// Reads and decodes synchronously inside `fetch`, so on a single-threaded
/// executor the frames of a sequence load one after another. Meant for
/// local tooling and tests; browsers use `ImageElementFetcher`.
#[derive(Clone, Debug)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, uri: &str) -> PathBuf {
        self.root.join(uri.trim_start_matches('/'))
    }
}

impl FrameFetcher for DirectoryFetcher {
    type Image = image::RgbaImage;

    async fn fetch(&self, uri: &str) -> PlayerResult<image::RgbaImage> {
        let path = self.resolve(uri);
        let bytes = std::fs::read(&path).map_err(|e| PlayerError::fetch(uri, e.to_string()))?;
        let decoded = image::load_from_memory(&bytes).map_err(|e| PlayerError::fetch(uri, e.to_string()))?;
        Ok(decoded.to_rgba8())
    }
}

/// Fetcher for the browser: loads each frame through an `HtmlImageElement`.
#[cfg(feature = "web")]
#[derive(Clone, Debug, Default)]
pub struct ImageElementFetcher;

#[cfg(feature = "web")]
impl FrameFetcher for ImageElementFetcher {
    type Image = web_sys::HtmlImageElement;

    async fn fetch(&self, uri: &str) -> PlayerResult<web_sys::HtmlImageElement> {
        let img = web_sys::HtmlImageElement::new().map_err(|_| PlayerError::fetch(uri, "failed to create image element"))?;

        let promise = js_sys::Promise::new(&mut |resolve, reject| {
            img.set_onload(Some(&resolve));
            img.set_onerror(Some(&reject));
        });
        img.set_src(uri);

        let settled = wasm_bindgen_futures::JsFuture::from(promise).await;
        img.set_onload(None);
        img.set_onerror(None);
        settled.map_err(|_| PlayerError::fetch(uri, "image failed to load"))?;

        Ok(img)
    }
}
