//! Normalized pointer input events.
//!
//! The input source (mouse, touch, stylus - local or relayed) normalizes
//! platform pointer events into [`PointerSample`] values before feeding them
//! to the gesture recognizer.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    /// Pointer pressed (finger down, button down, pen contact).
    Down,
    /// Pointer moved. Also fired for hover moves with nothing pressed.
    Move,
    /// Pointer released.
    Up,
    /// Input was cancelled by the platform (e.g. palm rejection).
    Cancel,
    /// Pointer entered the surface.
    Enter,
    /// Pointer left the surface.
    Leave,
    /// The surface gained pointer capture.
    CaptureGained,
    /// The surface lost pointer capture.
    CaptureLost,
}

/// Modifier keys held while a pointer event was produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct PointerModifiers {
    /// Shift key pressed.
    pub shift: bool,
    /// Control key pressed.
    pub ctrl: bool,
    /// Alt/Option key pressed.
    pub alt: bool,
    /// Meta/Command key pressed.
    pub meta: bool,
}

/// A single normalized pointer event.
///
/// Immutable once produced. The `timestamp` is supplied by the input source
/// and is the recognizer's only clock, so identical sample sequences
/// classify identically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    /// Event phase.
    pub phase: PointerPhase,
    /// Position in surface space.
    pub position: Vec2,
    /// Position in raw device space.
    pub raw_position: Vec2,
    /// Contact pressure in `[0, 1]`.
    pub pressure: f64,
    /// Stable identifier of the pointer across its down..up lifetime.
    pub pointer_id: u32,
    /// Modifier keys held during the event.
    pub modifiers: PointerModifiers,
    /// Event time in milliseconds.
    pub timestamp: u64,
}

impl PointerSample {
    /// Create a sample at full pressure with raw position equal to the
    /// surface position.
    #[must_use]
    pub fn new(phase: PointerPhase, position: Vec2, pointer_id: u32, timestamp: u64) -> Self {
        Self {
            phase,
            position,
            raw_position: position,
            pressure: 1.0,
            pointer_id,
            modifiers: PointerModifiers::default(),
            timestamp,
        }
    }

    /// Set the contact pressure.
    #[must_use]
    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = pressure;
        self
    }

    /// Set the raw device-space position.
    #[must_use]
    pub fn with_raw_position(mut self, raw: Vec2) -> Self {
        self.raw_position = raw;
        self
    }

    /// Set the modifier keys.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: PointerModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
