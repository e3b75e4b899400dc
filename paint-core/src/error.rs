//! Error types for core painting operations.

use thiserror::Error;

/// Result type for core painting operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core painting operations.
///
/// Steady-state input conditions (unknown pointer phases, degenerate
/// geometry) are handled locally by the components and never surface here;
/// these variants cover caller-supplied configuration only.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Brush parameters violate the model invariants.
    #[error("Invalid brush parameters: {0}")]
    InvalidBrush(String),

    /// A color string could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}
