//! # Paint Core
//!
//! Core logic for the freehand painting engine: raw pointer input is
//! classified into higher-level gestures, which downstream components turn
//! into timestamped brush samples and rendered strokes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 paint-core                  │
//! ├──────────────────────┬──────────────────────┤
//! │  Gesture Recognizer  │  Brush Model         │
//! │  - Pointer samples   │  - Size / spacing    │
//! │  - Tap / drag /      │  - Expression curves │
//! │    hold / pinch      │  - Colors            │
//! ├──────────────────────┴──────────────────────┤
//! │  Relay Boundary (plain data, no transport)  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! This crate has no raster or I/O dependencies; rendering lives in
//! `paint-renderer`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::float_cmp)]

pub mod brush;
pub mod color;
pub mod error;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod recognizer;
pub mod relay;

pub use brush::{Brush, BrushCatalog, BrushPoint, CompositeMode, ExpressionCurve};
pub use color::Color;
pub use error::{CoreError, CoreResult};
pub use event::{PointerModifiers, PointerPhase, PointerSample};
pub use geometry::Vec2;
pub use gesture::{GestureKind, GestureSample};
pub use recognizer::GestureRecognizer;
pub use relay::{LayerSnapshot, RelayMessage, StrokeBatch};

/// Paint core version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
