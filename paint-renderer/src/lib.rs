//! # Paint Renderer
//!
//! Raster side of the freehand painting engine: turns gesture samples into
//! brush strokes on a multi-layer raster image.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               PaintCanvas                   │
//! │  - drains gesture queue, routes handlers    │
//! │  - pan / zoom view transform                │
//! │  - stroke history boundaries                │
//! ├──────────────────────┬──────────────────────┤
//! │  StrokeRenderer      │  LayeredImage        │
//! │  - continuity state  │  - ordered layers    │
//! │  - fixed-step        │  - per-layer opacity │
//! │    interpolation     │  - active layer      │
//! ├──────────────────────┴──────────────────────┤
//! │  RasterSurface trait │ PixmapSurface (CPU)  │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::float_cmp)]
// Raster math converts between pixel indices and surface coordinates.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

pub mod canvas;
pub mod error;
pub mod layers;
pub mod pixmap;
pub mod stroke;
pub mod surface;
pub mod texture;

pub use canvas::{
    DirtyRegion, HoldHandler, NoHistory, NoHoldHandler, PaintCanvas, StrokeHistory, ZOOM_FACTOR,
};
pub use error::{RenderError, RenderResult};
pub use layers::LayeredImage;
pub use pixmap::PixmapSurface;
pub use stroke::{draw_imprint, draw_line, StrokeRenderer};
pub use surface::RasterSurface;
pub use texture::load_texture_from_bytes;

/// Paint renderer version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
