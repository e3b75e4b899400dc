//! CPU raster surface backed by an `RgbaImage`.

use image::{Rgba, RgbaImage};
use paint_core::{Color, CompositeMode, Vec2};

use crate::surface::RasterSurface;

/// A software rasterizing surface.
///
/// Pixels are 8-bit RGBA, straight (non-premultiplied) alpha. Circle fills
/// get one pixel of edge anti-aliasing; texture blits are nearest-neighbor.
#[derive(Debug, Clone)]
pub struct PixmapSurface {
    pixels: RgbaImage,
}

impl PixmapSurface {
    /// Create a fully transparent surface.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "surface dimensions must be non-zero");
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    /// Create a surface filled with an opaque color.
    #[must_use]
    pub fn new_filled(width: u32, height: u32, color: Color) -> Self {
        let mut surface = Self::new(width, height);
        surface.fill(color);
        surface
    }

    /// Wrap an existing image.
    #[must_use]
    pub fn from_image(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Borrow the backing image.
    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Consume the surface, returning the backing image.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Composite one source fragment onto a destination pixel.
    fn blend(dst: &mut Rgba<u8>, color: Color, alpha: f64, mode: CompositeMode) {
        let sa = alpha.clamp(0.0, 1.0) * color.alpha();
        if sa <= 0.0 {
            return;
        }
        let da = f64::from(dst[3]) / 255.0;

        match mode {
            CompositeMode::SourceOver => {
                let out_a = sa + da * (1.0 - sa);
                if out_a <= 0.0 {
                    *dst = Rgba([0, 0, 0, 0]);
                    return;
                }
                let channel = |s: u8, d: u8| {
                    let s = f64::from(s) / 255.0;
                    let d = f64::from(d) / 255.0;
                    let out = (s * sa + d * da * (1.0 - sa)) / out_a;
                    (out * 255.0).round() as u8
                };
                *dst = Rgba([
                    channel(color.r, dst[0]),
                    channel(color.g, dst[1]),
                    channel(color.b, dst[2]),
                    (out_a * 255.0).round() as u8,
                ]);
            }
            CompositeMode::DestinationOut => {
                let out_a = da * (1.0 - sa);
                dst[3] = (out_a * 255.0).round() as u8;
            }
            CompositeMode::Multiply => {
                // Multiply the channels, then composite the product source-over.
                let product = Color::new(
                    ((f64::from(color.r) * f64::from(dst[0])) / 255.0).round() as u8,
                    ((f64::from(color.g) * f64::from(dst[1])) / 255.0).round() as u8,
                    ((f64::from(color.b) * f64::from(dst[2])) / 255.0).round() as u8,
                    color.a,
                );
                Self::blend(dst, product, alpha, CompositeMode::SourceOver);
            }
        }
    }
}

impl RasterSurface for PixmapSurface {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn fill_circle(
        &mut self,
        center: Vec2,
        radius: f64,
        color: Color,
        alpha: f64,
        mode: CompositeMode,
    ) {
        if radius <= 0.0 || alpha <= 0.0 {
            return;
        }
        let min_x = ((center.x - radius).floor().max(0.0)) as u32;
        let min_y = ((center.y - radius).floor().max(0.0)) as u32;
        let max_x = ((center.x + radius).ceil()).min(f64::from(self.width() - 1)) as u32;
        let max_y = ((center.y + radius).ceil()).min(f64::from(self.height() - 1)) as u32;
        if min_x > max_x || min_y > max_y {
            return;
        }

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dist = Vec2::new(f64::from(x) + 0.5, f64::from(y) + 0.5).distance_to(center);
                // One pixel of edge coverage falloff.
                let coverage = (radius + 0.5 - dist).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    Self::blend(
                        self.pixels.get_pixel_mut(x, y),
                        color,
                        alpha * coverage,
                        mode,
                    );
                }
            }
        }
    }

    fn blit_scaled(
        &mut self,
        texture: &RgbaImage,
        dst: Vec2,
        dst_w: f64,
        dst_h: f64,
        alpha: f64,
        mode: CompositeMode,
    ) {
        if dst_w <= 0.0 || dst_h <= 0.0 || alpha <= 0.0 {
            return;
        }
        let (tex_w, tex_h) = texture.dimensions();
        if tex_w == 0 || tex_h == 0 {
            return;
        }
        let min_x = (dst.x.floor().max(0.0)) as u32;
        let min_y = (dst.y.floor().max(0.0)) as u32;
        let max_x = ((dst.x + dst_w).ceil()).min(f64::from(self.width())) as u32;
        let max_y = ((dst.y + dst_h).ceil()).min(f64::from(self.height())) as u32;

        for y in min_y..max_y {
            for x in min_x..max_x {
                // Nearest-neighbor sample at the pixel center.
                let u = ((f64::from(x) + 0.5 - dst.x) / dst_w).clamp(0.0, 1.0);
                let v = ((f64::from(y) + 0.5 - dst.y) / dst_h).clamp(0.0, 1.0);
                let sx = ((u * f64::from(tex_w)) as u32).min(tex_w - 1);
                let sy = ((v * f64::from(tex_h)) as u32).min(tex_h - 1);
                let texel = texture.get_pixel(sx, sy);
                let color = Color::new(texel[0], texel[1], texel[2], texel[3]);
                Self::blend(self.pixels.get_pixel_mut(x, y), color, alpha, mode);
            }
        }
    }

    fn fill(&mut self, color: Color) {
        let px = Rgba([color.r, color.g, color.b, color.a]);
        for pixel in self.pixels.pixels_mut() {
            *pixel = px;
        }
    }

    fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }
}
