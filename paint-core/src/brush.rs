//! Brush model: per-stroke brush parameters, brush points and expression
//! curves.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{CoreError, CoreResult};
use crate::geometry::Vec2;

/// How imprints composite onto the layer below.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeMode {
    /// Standard alpha blending.
    #[default]
    SourceOver,
    /// Erase: removes destination alpha where the source covers it.
    DestinationOut,
    /// Multiply the channels (darkens).
    Multiply,
}

/// Maps a brush point attribute to a size modulation.
///
/// A tagged variant rather than a dispatch object: the curve is selected by
/// tag and applied by a pure function. [`ExpressionCurve::None`] is the
/// identity, so a brush without a curve uses the plain pressure formula.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "snake_case")]
pub enum ExpressionCurve {
    /// No modulation.
    #[default]
    None,
    /// Scale by normalized stroke speed.
    Speed {
        /// Speed mapped to ratio 0.
        minimum: f64,
        /// Speed mapped to ratio 1.
        maximum: f64,
        /// Flip the ramp (slow strokes produce large imprints).
        reverse: bool,
    },
}

impl ExpressionCurve {
    /// Apply the curve to `value` for the given point.
    #[must_use]
    pub fn apply(self, point: &BrushPoint, value: f64) -> f64 {
        match self {
            Self::None => value,
            Self::Speed {
                minimum,
                maximum,
                reverse,
            } => {
                if minimum == maximum {
                    return value;
                }
                let speed = point.speed.clamp(minimum, maximum);
                let mut ratio = (speed - minimum) / (maximum - minimum);
                if reverse {
                    ratio = 1.0 - ratio;
                }
                value * ratio
            }
        }
    }
}

/// A single timestamped point along a stroke.
///
/// Derived from a gesture sample plus the previously rendered point
/// (`speed` = distance / elapsed time). Mutated in place only while the
/// interpolator steps along a line segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BrushPoint {
    /// X coordinate in surface space.
    pub x: f64,
    /// Y coordinate in surface space.
    pub y: f64,
    /// Point time in milliseconds.
    pub timestamp: u64,
    /// Pressure in `[0, 1]`.
    pub pressure_factor: f64,
    /// Stroke angle in radians.
    pub angle: f64,
    /// Stroke speed in surface units per millisecond.
    pub speed: f64,
}

impl BrushPoint {
    /// Create a point at a position with a pressure; other attributes zero.
    #[must_use]
    pub fn new(position: Vec2, timestamp: u64, pressure_factor: f64) -> Self {
        Self {
            x: position.x,
            y: position.y,
            timestamp,
            pressure_factor,
            angle: 0.0,
            speed: 0.0,
        }
    }

    /// Position as a vector.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(a: &Self, b: &Self) -> f64 {
        a.position().distance_to(b.position())
    }
}

/// Immutable-per-stroke description of a brush.
///
/// The orchestrator owns the current brush and lends it read-only to the
/// renderer for the duration of a stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    /// Brush name (the key the asset catalog resolves).
    pub name: String,
    /// Base imprint size in surface units.
    pub size: f64,
    /// Minimum size as a ratio of `size`, in `[0, 1]`.
    pub minimum_size_ratio: f64,
    /// Imprint spacing as a ratio of `size`; must be positive.
    pub distance_ratio: f64,
    /// Brush color.
    pub color: Color,
    /// Compositing mode for imprints.
    pub composite_mode: CompositeMode,
    /// Name of the texture to stamp instead of a filled circle, if any.
    /// Resolved to pixels by the asset collaborator.
    pub texture: Option<String>,
    /// Size modulation curve.
    pub expression_curve: ExpressionCurve,
}

impl Brush {
    /// Create a brush with the catalog defaults and the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Gap enforced between consecutive imprints: `size * distance_ratio`.
    #[must_use]
    pub fn spacing_distance(&self) -> f64 {
        self.size * self.distance_ratio
    }

    /// Smallest imprint size: `size * minimum_size_ratio`.
    #[must_use]
    pub fn minimum_size(&self) -> f64 {
        self.size * self.minimum_size_ratio
    }

    /// Check the model invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidBrush`] if `distance_ratio` is not
    /// positive, `minimum_size_ratio` is outside `[0, 1]`, or `size` is not
    /// positive.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(CoreError::InvalidBrush(format!(
                "size must be positive, got {}",
                self.size
            )));
        }
        if !self.distance_ratio.is_finite() || self.distance_ratio <= 0.0 {
            return Err(CoreError::InvalidBrush(format!(
                "distance_ratio must be positive, got {}",
                self.distance_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.minimum_size_ratio) {
            return Err(CoreError::InvalidBrush(format!(
                "minimum_size_ratio must be in [0, 1], got {}",
                self.minimum_size_ratio
            )));
        }
        Ok(())
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            name: String::new(),
            size: 10.0,
            minimum_size_ratio: 0.1,
            distance_ratio: 0.1,
            color: Color::BLACK,
            composite_mode: CompositeMode::SourceOver,
            texture: None,
            expression_curve: ExpressionCurve::None,
        }
    }
}

/// Resolves brush names to brush models.
///
/// The asset pipeline behind this trait (parameter files, texture images) is
/// an external collaborator; the engine only requires that resolved brushes
/// satisfy [`Brush::validate`].
pub trait BrushCatalog {
    /// All brush names this catalog can resolve.
    fn brush_names(&self) -> Vec<String>;

    /// Resolve a brush by name.
    fn resolve(&self, name: &str) -> Option<Brush>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_sizes() {
        let brush = Brush {
            size: 12.0,
            minimum_size_ratio: 0.1,
            distance_ratio: 0.1,
            ..Brush::default()
        };
        assert!((brush.spacing_distance() - 1.2).abs() < 1e-12);
        assert!((brush.minimum_size() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_validation() {
        assert!(Brush::default().validate().is_ok());

        let zero_spacing = Brush {
            distance_ratio: 0.0,
            ..Brush::default()
        };
        assert!(matches!(
            zero_spacing.validate(),
            Err(CoreError::InvalidBrush(_))
        ));

        let bad_minimum = Brush {
            minimum_size_ratio: 1.5,
            ..Brush::default()
        };
        assert!(bad_minimum.validate().is_err());
    }

    #[test]
    fn test_none_curve_is_identity() {
        let p = BrushPoint {
            speed: 42.0,
            ..BrushPoint::default()
        };
        assert_eq!(ExpressionCurve::None.apply(&p, 10.8), 10.8);
    }

    #[test]
    fn test_speed_curve_ramps_and_clamps() {
        let curve = ExpressionCurve::Speed {
            minimum: 0.0,
            maximum: 10.0,
            reverse: false,
        };
        let at = |speed| {
            curve.apply(
                &BrushPoint {
                    speed,
                    ..BrushPoint::default()
                },
                100.0,
            )
        };
        assert_eq!(at(0.0), 0.0);
        assert_eq!(at(5.0), 50.0);
        assert_eq!(at(10.0), 100.0);
        // Clamped above the maximum.
        assert_eq!(at(25.0), 100.0);
    }

    #[test]
    fn test_speed_curve_reverse() {
        let curve = ExpressionCurve::Speed {
            minimum: 0.0,
            maximum: 10.0,
            reverse: true,
        };
        let p = BrushPoint {
            speed: 10.0,
            ..BrushPoint::default()
        };
        assert_eq!(curve.apply(&p, 100.0), 0.0);
    }

    #[test]
    fn test_degenerate_speed_range_is_identity() {
        let curve = ExpressionCurve::Speed {
            minimum: 3.0,
            maximum: 3.0,
            reverse: false,
        };
        let p = BrushPoint::default();
        assert_eq!(curve.apply(&p, 7.0), 7.0);
    }
}
