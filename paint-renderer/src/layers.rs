//! Multi-layer raster image store.

use image::RgbaImage;
use paint_core::{Color, CompositeMode, Vec2};

use crate::pixmap::PixmapSurface;
use crate::surface::RasterSurface;

/// An ordered stack of raster layers with per-layer opacity.
///
/// Layer 0 is the background and is created opaque white; layers above it
/// are created transparent. Layers are added and removed explicitly, never
/// implicitly. Index arguments are caller contracts: passing an invalid
/// index is a programmer error and panics rather than silently drawing to
/// the wrong layer.
#[derive(Debug, Clone)]
pub struct LayeredImage {
    width: u32,
    height: u32,
    layers: Vec<PixmapSurface>,
    opacities: Vec<f64>,
    active: usize,
}

impl LayeredImage {
    /// Create an image with a white background layer plus one transparent
    /// paint layer; the paint layer is active.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let mut image = Self {
            width,
            height,
            layers: Vec::new(),
            opacities: Vec::new(),
            active: 0,
        };
        image.layers.push(PixmapSurface::new_filled(width, height, Color::WHITE));
        image.opacities.push(1.0);
        image.add_layer();
        image
    }

    /// Image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Index of the active (stroke target) layer.
    #[must_use]
    pub fn active_layer_index(&self) -> usize {
        self.active
    }

    /// Select the stroke target layer.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set_active_layer(&mut self, index: usize) {
        assert!(index < self.layers.len(), "layer index {index} out of bounds");
        self.active = index;
    }

    /// Borrow a layer.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn layer(&self, index: usize) -> &PixmapSurface {
        &self.layers[index]
    }

    /// Mutably borrow a layer.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn layer_mut(&mut self, index: usize) -> &mut PixmapSurface {
        &mut self.layers[index]
    }

    /// Mutably borrow the active layer.
    pub fn active_layer_mut(&mut self) -> &mut PixmapSurface {
        &mut self.layers[self.active]
    }

    /// Opacity of a layer.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn opacity(&self, index: usize) -> f64 {
        self.opacities[index]
    }

    /// Set a layer's opacity, clamped to `[0, 1]`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set_opacity(&mut self, index: usize, opacity: f64) {
        assert!(index < self.opacities.len(), "layer index {index} out of bounds");
        self.opacities[index] = opacity.clamp(0.0, 1.0);
    }

    /// Append a transparent layer and make it active.
    pub fn add_layer(&mut self) -> usize {
        self.insert_layer(self.layers.len())
    }

    /// Insert a transparent layer at `index` and make it active.
    ///
    /// The opacity entry is inserted at the same index, keeping the layer
    /// and opacity sequences parallel.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than the layer count.
    pub fn insert_layer(&mut self, index: usize) -> usize {
        assert!(index <= self.layers.len(), "layer index {index} out of bounds");
        self.layers
            .insert(index, PixmapSurface::new(self.width, self.height));
        self.opacities.insert(index, 1.0);
        self.active = index;
        index
    }

    /// Remove a layer.
    ///
    /// The active index is clamped to the remaining stack.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds, or when removing the last
    /// remaining layer.
    pub fn remove_layer(&mut self, index: usize) {
        assert!(index < self.layers.len(), "layer index {index} out of bounds");
        assert!(self.layers.len() > 1, "cannot remove the last layer");
        self.layers.remove(index);
        self.opacities.remove(index);
        self.active = self.active.min(self.layers.len() - 1);
    }

    /// Wipe the image: the background layer back to opaque white, all other
    /// layers to transparent.
    pub fn clear(&mut self) {
        tracing::debug!(layers = self.layers.len(), "clearing canvas");
        for (i, layer) in self.layers.iter_mut().enumerate() {
            if i == 0 {
                layer.fill(Color::WHITE);
            } else {
                layer.clear();
            }
        }
    }

    /// Composite all layers bottom-up into a single image, honoring layer
    /// opacity.
    #[must_use]
    pub fn flatten(&self) -> RgbaImage {
        let mut out = PixmapSurface::new(self.width, self.height);
        for (layer, &opacity) in self.layers.iter().zip(&self.opacities) {
            if opacity <= 0.0 {
                continue;
            }
            out.blit_scaled(
                layer.image(),
                Vec2::ZERO,
                f64::from(self.width),
                f64::from(self.height),
                opacity,
                CompositeMode::SourceOver,
            );
        }
        out.into_image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_image_has_white_background_and_active_paint_layer() {
        let image = LayeredImage::new(16, 16);
        assert_eq!(image.layer_count(), 2);
        assert_eq!(image.active_layer_index(), 1);
        assert_eq!(image.layer(0).image().get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(image.layer(1).image().get_pixel(0, 0)[3], 0);
        assert_eq!(image.opacity(0), 1.0);
    }

    #[test]
    fn test_insert_keeps_sequences_parallel() {
        let mut image = LayeredImage::new(8, 8);
        image.set_opacity(1, 0.25);
        image.insert_layer(1);
        assert_eq!(image.layer_count(), 3);
        assert_eq!(image.active_layer_index(), 1);
        // The pre-existing opacity moved up with its layer.
        assert_eq!(image.opacity(1), 1.0);
        assert_eq!(image.opacity(2), 0.25);
    }

    #[test]
    fn test_remove_clamps_active_index() {
        let mut image = LayeredImage::new(8, 8);
        image.add_layer();
        assert_eq!(image.active_layer_index(), 2);
        image.remove_layer(2);
        assert_eq!(image.active_layer_index(), 1);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_invalid_active_index_panics() {
        let mut image = LayeredImage::new(8, 8);
        image.set_active_layer(5);
    }

    #[test]
    fn test_clear_restores_initial_content() {
        let mut image = LayeredImage::new(8, 8);
        image.active_layer_mut().fill(Color::BLACK);
        image.layer_mut(0).fill(Color::rgb(1, 2, 3));
        image.clear();
        assert_eq!(image.layer(0).image().get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(image.layer(1).image().get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_flatten_honors_opacity() {
        let mut image = LayeredImage::new(4, 4);
        image.active_layer_mut().fill(Color::BLACK);
        image.set_opacity(1, 0.5);
        let flat = image.flatten();
        let px = flat.get_pixel(2, 2);
        // Half-opaque black over white is mid grey.
        assert!(px[0] > 120 && px[0] < 135);
        assert_eq!(px[3], 255);
    }
}
