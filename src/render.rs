//! Drawing frames onto a 2D canvas.
//!
//! [`Canvas2d`] abstracts the handful of 2D-context calls the player makes.
//! [`CanvasSurface`] owns one and keeps its transform at `scale(dpr, dpr)`
//! so every draw is issued in logical pixels.

use crate::{Color, CoverFit, FrameImage, FrameSet, PlayerResult, SurfaceSize};

/// Axis-aligned affine transform: scale, then translate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub sx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        sx: 1.0,
        sy: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Post-multiply by a scale, the way a 2D context's `scale()` does.
    #[inline]
    pub fn scaled(self, sx: f64, sy: f64) -> Self {
        Self {
            sx: self.sx * sx,
            sy: self.sy * sy,
            ..self
        }
    }

    /// Map a point from drawing coordinates to backing-store pixels.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.sx + self.tx, y * self.sy + self.ty)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The subset of a 2D drawing context the player needs.
///
/// Coordinates passed to the drawing methods go through the current
/// transform. Resizing the backing store clears it and resets the transform,
/// matching browser canvases.
pub trait Canvas2d {
    /// Image type this canvas can draw
    type Image: FrameImage;

    /// Resize the backing store to `width x height` physical pixels.
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Current backing store size in physical pixels.
    fn backing_size(&self) -> (u32, u32);

    /// Set the transform back to identity.
    fn reset_transform(&mut self) -> PlayerResult<()>;

    /// Multiply the current transform by a scale. Cumulative.
    fn scale(&mut self, sx: f64, sy: f64) -> PlayerResult<()>;

    /// The current transform.
    fn transform(&self) -> Transform;

    /// Make a rectangle fully transparent.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Fill a rectangle with an opaque colour.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);

    /// Draw `image` stretched into the given rectangle.
    fn draw_image(&mut self, image: &Self::Image, x: f64, y: f64, width: f64, height: f64) -> PlayerResult<()>;
}

/// A single frame draw, in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramePlan {
    /// Frame index being drawn
    pub index: usize,
    /// Logical area cleared before drawing
    pub clear_width: f64,
    pub clear_height: f64,
    /// Cover placement of the image
    pub fit: CoverFit,
}

/// Work out how frame `index` would be drawn into `size`.
///
/// Returns None when there is nothing to draw: no frames loaded, a failed
/// slot, an out-of-range index or a degenerate image.
pub fn plan_frame<I: FrameImage>(frames: &FrameSet<I>, index: usize, size: &SurfaceSize) -> Option<FramePlan> {
    if frames.is_empty() {
        return None;
    }
    let image = frames.get(index)?;
    let fit = CoverFit::compute(size.logical_width, size.logical_height, image.width(), image.height())?;
    Some(FramePlan {
        index,
        clear_width: size.logical_width,
        clear_height: size.logical_height,
        fit,
    })
}

/// A canvas plus the logical size and pixel ratio it was configured for.
#[derive(Debug)]
pub struct CanvasSurface<C> {
    canvas: C,
    size: SurfaceSize,
}

impl<C: Canvas2d> CanvasSurface<C> {
    /// Wrap a canvas and configure it for `size`.
    pub fn new(canvas: C, size: SurfaceSize) -> PlayerResult<Self> {
        let mut surface = Self { canvas, size };
        surface.configure(size)?;
        Ok(surface)
    }

    /// Size the backing store to `logical * dpr` and set the transform to
    /// exactly `scale(dpr, dpr)`.
    ///
    /// The transform is reset before scaling, so repeated calls never compound.
    pub fn configure(&mut self, size: SurfaceSize) -> PlayerResult<()> {
        let (width, height) = size.backing_size();
        self.canvas.set_backing_size(width, height);
        self.canvas.reset_transform()?;
        self.canvas.scale(size.dpr, size.dpr)?;
        self.size = size;
        tracing::debug!(
            logical_width = size.logical_width,
            logical_height = size.logical_height,
            dpr = size.dpr,
            width,
            height,
            "configured canvas surface"
        );
        Ok(())
    }

    #[inline]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    #[inline]
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    #[inline]
    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// Draw frame `index` with cover placement.
    ///
    /// A no-op returning `false` when the frame is unavailable; whatever is
    /// on the canvas stays there. Draw failures are logged, not returned.
    pub fn render_frame(&mut self, frames: &FrameSet<C::Image>, index: usize) -> bool {
        let Some(plan) = plan_frame(frames, index, &self.size) else {
            tracing::trace!(index, "frame unavailable, holding previous");
            return false;
        };
        let Some(image) = frames.get(index) else {
            return false;
        };

        self.canvas.clear_rect(0.0, 0.0, plan.clear_width, plan.clear_height);
        let fit = plan.fit;
        match self.canvas.draw_image(image, fit.x, fit.y, fit.width, fit.height) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(index, error = %err, "failed to draw frame");
                false
            }
        }
    }

    /// Fill the whole logical area with `color`.
    pub fn paint_placeholder(&mut self, color: Color) {
        let SurfaceSize {
            logical_width,
            logical_height,
            ..
        } = self.size;
        self.canvas.fill_rect(0.0, 0.0, logical_width, logical_height, color);
    }
}

/// Software canvas backed by an RGBA buffer.
///
/// Pixels are sampled nearest-neighbour and copied without blending. Useful
/// for headless rendering (thumbnails, snapshots) and for tests, since the
/// result of every draw can be read back in physical pixels.
#[derive(Clone, Debug)]
pub struct RasterCanvas {
    pixels: image::RgbaImage,
    transform: Transform,
}

impl Default for RasterCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterCanvas {
    pub fn new() -> Self {
        Self {
            pixels: image::RgbaImage::new(0, 0),
            transform: Transform::IDENTITY,
        }
    }

    /// The backing store.
    #[inline]
    pub fn pixels(&self) -> &image::RgbaImage {
        &self.pixels
    }

    /// Pixel at physical coordinates, if inside the backing store.
    pub fn pixel(&self, x: u32, y: u32) -> Option<image::Rgba<u8>> {
        let (w, h) = self.pixels.dimensions();
        (x < w && y < h).then(|| *self.pixels.get_pixel(x, y))
    }

    /// Physical pixel span covered by a logical rectangle, clipped to the
    /// backing store. A pixel is covered when its centre lies inside.
    fn physical_span(&self, x: f64, y: f64, width: f64, height: f64) -> Option<PixelSpan> {
        let (x0, y0) = self.transform.apply(x, y);
        let (x1, y1) = self.transform.apply(x + width, y + height);
        let (left, right) = (x0.min(x1), x0.max(x1));
        let (top, bottom) = (y0.min(y1), y0.max(y1));
        if !(right > left && bottom > top) {
            return None;
        }

        let (w, h) = self.pixels.dimensions();
        let clip = |v: f64, max: u32| (v - 0.5).ceil().clamp(0.0, max as f64) as u32;
        let span = PixelSpan {
            left,
            top,
            width: right - left,
            height: bottom - top,
            px0: clip(left, w),
            px1: clip(right, w),
            py0: clip(top, h),
            py1: clip(bottom, h),
        };
        (span.px0 < span.px1 && span.py0 < span.py1).then_some(span)
    }

    fn fill_span(&mut self, span: &PixelSpan, color: image::Rgba<u8>) {
        for py in span.py0..span.py1 {
            for px in span.px0..span.px1 {
                self.pixels.put_pixel(px, py, color);
            }
        }
    }
}

struct PixelSpan {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    px0: u32,
    px1: u32,
    py0: u32,
    py1: u32,
}

impl Canvas2d for RasterCanvas {
    type Image = image::RgbaImage;

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.pixels = image::RgbaImage::new(width, height);
        self.transform = Transform::IDENTITY;
    }

    fn backing_size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    fn reset_transform(&mut self) -> PlayerResult<()> {
        self.transform = Transform::IDENTITY;
        Ok(())
    }

    fn scale(&mut self, sx: f64, sy: f64) -> PlayerResult<()> {
        self.transform = self.transform.scaled(sx, sy);
        Ok(())
    }

    fn transform(&self) -> Transform {
        self.transform
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        if let Some(span) = self.physical_span(x, y, width, height) {
            self.fill_span(&span, image::Rgba([0, 0, 0, 0]));
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        if let Some(span) = self.physical_span(x, y, width, height) {
            self.fill_span(&span, color.to_rgba());
        }
    }

    fn draw_image(&mut self, image: &image::RgbaImage, x: f64, y: f64, width: f64, height: f64) -> PlayerResult<()> {
        let (iw, ih) = image.dimensions();
        if iw == 0 || ih == 0 {
            return Ok(());
        }
        let Some(span) = self.physical_span(x, y, width, height) else {
            return Ok(());
        };

        for py in span.py0..span.py1 {
            let v = ((py as f64 + 0.5 - span.top) / span.height * ih as f64).floor();
            let sy = (v.max(0.0) as u32).min(ih - 1);
            for px in span.px0..span.px1 {
                let u = ((px as f64 + 0.5 - span.left) / span.width * iw as f64).floor();
                let sx = (u.max(0.0) as u32).min(iw - 1);
                self.pixels.put_pixel(px, py, *image.get_pixel(sx, sy));
            }
        }
        Ok(())
    }
}

/// Web-specific rendering implementation.
#[cfg(feature = "web")]
pub mod web {
    use super::*;
    use crate::PlayerError;
    use wasm_bindgen::JsCast;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

    /// A `<canvas>` element and its 2D context.
    #[derive(Clone, Debug)]
    pub struct WebCanvas {
        element: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        transform: Transform,
    }

    impl WebCanvas {
        /// Acquire the 2D context of `element`.
        ///
        /// Fails when the environment has no 2D canvas support.
        pub fn from_element(element: HtmlCanvasElement) -> PlayerResult<Self> {
            let ctx = element
                .get_context("2d")
                .map_err(|_| PlayerError::surface("failed to get 2d context"))?
                .ok_or_else(|| PlayerError::surface("no 2d context available"))?
                .dyn_into::<CanvasRenderingContext2d>()
                .map_err(|_| PlayerError::surface("failed to cast to CanvasRenderingContext2d"))?;
            ctx.set_image_smoothing_enabled(true);
            Ok(Self {
                element,
                ctx,
                transform: Transform::IDENTITY,
            })
        }

        #[inline]
        pub fn element(&self) -> &HtmlCanvasElement {
            &self.element
        }
    }

    impl Canvas2d for WebCanvas {
        type Image = HtmlImageElement;

        fn set_backing_size(&mut self, width: u32, height: u32) {
            // Assigning width/height resets the whole context state.
            self.element.set_width(width);
            self.element.set_height(height);
            self.transform = Transform::IDENTITY;
            self.ctx.set_image_smoothing_enabled(true);
        }

        fn backing_size(&self) -> (u32, u32) {
            (self.element.width(), self.element.height())
        }

        fn reset_transform(&mut self) -> PlayerResult<()> {
            self.ctx
                .set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
                .map_err(|_| PlayerError::surface("failed to reset transform"))?;
            self.transform = Transform::IDENTITY;
            Ok(())
        }

        fn scale(&mut self, sx: f64, sy: f64) -> PlayerResult<()> {
            self.ctx
                .scale(sx, sy)
                .map_err(|_| PlayerError::surface("failed to scale context"))?;
            self.transform = self.transform.scaled(sx, sy);
            Ok(())
        }

        fn transform(&self) -> Transform {
            self.transform
        }

        fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
            self.ctx.clear_rect(x, y, width, height);
        }

        fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
            self.ctx.set_fill_style_str(&color.css());
            self.ctx.fill_rect(x, y, width, height);
        }

        fn draw_image(&mut self, image: &HtmlImageElement, x: f64, y: f64, width: f64, height: f64) -> PlayerResult<()> {
            self.ctx
                .draw_image_with_html_image_element_and_dw_and_dh(image, x, y, width, height)
                .map_err(|_| PlayerError::surface("failed to draw image"))
        }
    }

    /// The window's device pixel ratio, 1.0 when unavailable.
    pub fn device_pixel_ratio() -> f64 {
        web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
    }

    /// Logical size of `element`'s layout box at the current pixel ratio.
    pub fn surface_size_of(element: &HtmlCanvasElement) -> SurfaceSize {
        let rect = element.get_bounding_client_rect();
        SurfaceSize::new(rect.width(), rect.height(), device_pixel_ratio())
    }
}
