//! Relay boundary types.
//!
//! Painting sessions can be shared between participants through an external
//! transport collaborator. The engine's side of that boundary is plain data:
//! it emits stroke batches and whole-canvas snapshots as values, and replays
//! received batches through the same pointer pipeline as local input. No
//! wire format or transport lives here.

use serde::{Deserialize, Serialize};

use crate::brush::Brush;
use crate::event::PointerSample;

/// One stroke's worth of pointer samples plus the brush that drew it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeBatch {
    /// The pointer samples of the stroke, in temporal order.
    pub points: Vec<PointerSample>,
    /// Brush parameters the stroke was drawn with.
    pub brush: Brush,
}

impl StrokeBatch {
    /// Create a batch.
    #[must_use]
    pub fn new(points: Vec<PointerSample>, brush: Brush) -> Self {
        Self { points, brush }
    }
}

/// A raster layer captured for a snapshot exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    /// Layer opacity in `[0, 1]`.
    pub opacity: f64,
    /// Raw RGBA pixel bytes, row-major, 4 bytes per pixel.
    pub data: Vec<u8>,
}

/// Messages exchanged with the relay collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayMessage {
    /// A completed stroke to broadcast to other participants.
    Stroke {
        /// The stroke payload.
        batch: StrokeBatch,
    },
    /// Request the current canvas of another participant.
    SnapshotRequest,
    /// A whole-canvas snapshot.
    Snapshot {
        /// Canvas width in pixels.
        width: u32,
        /// Canvas height in pixels.
        height: u32,
        /// All layers, bottom first.
        layers: Vec<LayerSnapshot>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PointerPhase;
    use crate::geometry::Vec2;

    #[test]
    fn test_stroke_message_round_trip() {
        let batch = StrokeBatch::new(
            vec![
                PointerSample::new(PointerPhase::Down, Vec2::new(1.0, 2.0), 7, 0),
                PointerSample::new(PointerPhase::Up, Vec2::new(3.0, 4.0), 7, 50)
                    .with_pressure(0.5),
            ],
            Brush::new("pencil"),
        );
        let msg = RelayMessage::Stroke { batch };

        let json = serde_json::to_string(&msg).expect("serialize");
        let back: RelayMessage = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, msg);
    }

    #[test]
    fn test_snapshot_message_tags() {
        let json = serde_json::to_string(&RelayMessage::SnapshotRequest).expect("serialize");
        assert!(json.contains("\"snapshot_request\""));
    }
}
