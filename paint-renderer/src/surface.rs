//! The rasterizing surface seam.
//!
//! Stroke rendering is written against this trait so the imprint algorithms
//! do not care whether the target is the bundled CPU pixmap or an external
//! accelerated surface.

use image::RgbaImage;
use paint_core::{Color, CompositeMode, Vec2};

/// A 2D rasterizing target for brush imprints.
pub trait RasterSurface {
    /// Surface width in pixels.
    fn width(&self) -> u32;

    /// Surface height in pixels.
    fn height(&self) -> u32;

    /// Fill a circle of `radius` centered on `center`.
    ///
    /// `alpha` in `[0, 1]` scales the color's own alpha; `mode` selects the
    /// compositing rule.
    fn fill_circle(&mut self, center: Vec2, radius: f64, color: Color, alpha: f64, mode: CompositeMode);

    /// Stretch-blit `texture` into the destination rectangle with top-left
    /// corner `dst` and size `dst_w` x `dst_h`, scaling the texture's alpha
    /// by `alpha`.
    fn blit_scaled(
        &mut self,
        texture: &RgbaImage,
        dst: Vec2,
        dst_w: f64,
        dst_h: f64,
        alpha: f64,
        mode: CompositeMode,
    );

    /// Fill the whole surface with an opaque color.
    fn fill(&mut self, color: Color);

    /// Wipe the whole surface to transparent.
    fn clear(&mut self);
}
