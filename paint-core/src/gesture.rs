//! Classified gesture samples produced by the recognizer.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

/// The kind of a classified gesture.
///
/// Also doubles as the recognizer's outer mode: the machine stays in
/// `Pinch`, `Hold`, `HoldMove` or `FreeDrag` while the gesture continues,
/// and passes through the `*Complete` kinds for exactly one update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    /// No gesture.
    #[default]
    None,
    /// Two-finger pinch in progress.
    Pinch,
    /// A pinch ended (either finger lifted).
    PinchComplete,
    /// The pointer was held in place past the hold interval.
    Hold,
    /// Movement while holding.
    HoldMove,
    /// A hold-move ended.
    HoldComplete,
    /// A free drag ended.
    DragComplete,
    /// Freehand drag in progress.
    FreeDrag,
    /// Single tap.
    Tap,
    /// Two taps in quick succession at nearly the same spot.
    DoubleTap,
}

impl GestureKind {
    /// Whether samples of this kind feed the stroke queue (drawing) rather
    /// than view manipulation.
    #[must_use]
    pub fn is_stroke(self) -> bool {
        matches!(self, Self::Tap | Self::FreeDrag | Self::DragComplete)
    }
}

/// One classified gesture event.
///
/// Up to two pointers are represented (thumb and index finger for pinch);
/// single-pointer gestures leave the second slot zeroed. Deltas are computed
/// against the immediately preceding raw sample of the same pointer, not
/// against the gesture's start point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureSample {
    /// Gesture kind.
    pub kind: GestureKind,
    /// Position of the primary pointer.
    pub position: Vec2,
    /// Position of the secondary pointer (pinch only).
    pub position2: Vec2,
    /// Displacement of the primary pointer since the previous raw sample.
    pub delta: Vec2,
    /// Displacement of the secondary pointer since the previous raw sample.
    pub delta2: Vec2,
    /// Identifier of the primary pointer.
    pub position_id: u32,
    /// Identifier of the secondary pointer.
    pub position_id2: u32,
    /// Pressure of the primary pointer in `[0, 1]`.
    pub pressure_factor: f64,
    /// Pressure of the secondary pointer in `[0, 1]`.
    pub pressure_factor2: f64,
    /// Event time in milliseconds.
    pub timestamp: u64,
}

impl GestureSample {
    /// A marker sample carrying no positions (the `*Complete` kinds).
    #[must_use]
    pub fn marker(kind: GestureKind, timestamp: u64) -> Self {
        Self {
            kind,
            position: Vec2::ZERO,
            position2: Vec2::ZERO,
            delta: Vec2::ZERO,
            delta2: Vec2::ZERO,
            position_id: 0,
            position_id2: 0,
            pressure_factor: 0.0,
            pressure_factor2: 0.0,
            timestamp,
        }
    }

    /// A single-pointer sample.
    #[must_use]
    pub fn single(
        kind: GestureKind,
        position: Vec2,
        delta: Vec2,
        position_id: u32,
        pressure_factor: f64,
        timestamp: u64,
    ) -> Self {
        Self {
            kind,
            position,
            delta,
            position_id,
            pressure_factor,
            timestamp,
            ..Self::marker(kind, timestamp)
        }
    }
}
