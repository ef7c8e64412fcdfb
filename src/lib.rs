//! # scrolly-frames
//!
//! Scroll-synchronized frame-sequence playback for canvas heroes.
//!
//! This crate provides platform-agnostic data structures and logic for:
//! - Loading a numbered image sequence concurrently, tolerating missing frames
//! - Sizing a canvas for high-DPI displays and placing frames with "cover" fit
//! - Mapping scroll or elapsed-time progress to a frame index
//! - Painting exactly one frame per display refresh (with optional web support)
//!
//! ## Features
//!
//! - `serde` - Enable serialization/deserialization for configuration
//! - `toml` - Load [`PlayerConfig`] from TOML
//! - `web` - Enable web/WASM canvas rendering support
//! - `contact` - Contact-form relay endpoint
//!
//! ## Example
//!
//! ```rust,ignore
//! use scrolly_frames::{DirectoryFetcher, FrameSequencePlayer, PlayerConfig, RasterCanvas, SurfaceSize};
//!
//! let mut player = FrameSequencePlayer::new(PlayerConfig::default(), false)?;
//! player.mount(Ok(RasterCanvas::new()), SurfaceSize::new(1280.0, 720.0, 2.0));
//!
//! // Load /sequence/000.webp .. /sequence/119.webp from ./public
//! futures::executor::block_on(player.load(&DirectoryFetcher::new("public")));
//!
//! // From the paint loop
//! player.tick(now_ms);
//! ```

mod animation;
mod color;
mod config;
#[cfg(feature = "contact")]
pub mod contact;
mod data;
mod error;
mod loader;
mod overlay;
pub mod player;
mod progress;
pub mod render;
mod sizing;

pub use animation::{map_progress_to_frame, FrameClock, PaintState, PlaybackState, Termination};
pub use color::Color;
pub use config::{DriveMode, PlayerConfig};
pub use data::{FrameImage, FrameSet, FrameSource, LoadResult};
pub use error::{PlayerError, PlayerResult};
pub use loader::{load_frames, load_frames_with_progress, DirectoryFetcher, FrameFetcher, Liveness, LoadPhase, LoadingProgress};
pub use overlay::{CaptionFrame, CaptionTrack};
pub use player::FrameSequencePlayer;
pub use progress::{CriticalDamper, ElapsedProgress, ProgressDrive, ScrollLayout, ScrollProgress};
pub use render::{plan_frame, Canvas2d, CanvasSurface, FramePlan, RasterCanvas, Transform};
pub use sizing::{CoverFit, SurfaceSize};

#[cfg(feature = "web")]
pub use loader::ImageElementFetcher;
#[cfg(feature = "web")]
pub use render::web::WebCanvas;
