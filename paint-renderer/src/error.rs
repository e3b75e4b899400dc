//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur on the raster side.
///
/// Degenerate geometry and out-of-range imprints are expected steady-state
/// conditions handled locally; invalid layer indices are contract violations
/// that panic rather than surface here.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A resource (brush texture) failed to load or decode.
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// A surface could not be created.
    #[error("Surface error: {0}")]
    Surface(String),
}
