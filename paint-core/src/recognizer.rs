//! Gesture recognition state machine.
//!
//! Classifies a continuous pointer stream into discrete gestures, filtering
//! noise (tiny accidental moves) and timing ambiguity (tap vs. hold vs.
//! double-tap vs. drag). The machine is two-layered: an outer gesture mode
//! ([`GestureKind`]) tracks the gesture currently in flight, while an inner
//! native state tracks press/move/tap bookkeeping inside the `None` mode.
//!
//! The recognizer has no internal timers. All interval checks compare sample
//! timestamps, so the caller must feed samples (including hover moves)
//! frequently enough for the thresholds to be observed with acceptable
//! latency.

use std::collections::VecDeque;

use crate::event::{PointerPhase, PointerSample};
use crate::geometry::Vec2;
use crate::gesture::{GestureKind, GestureSample};

/// Inner state of the machine while the outer mode is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum NativeState {
    /// Nothing pending.
    #[default]
    None,
    /// A pointer moved past the noise thresholds.
    Moved,
    /// A pointer is pressed.
    Pressed,
    /// A tap was registered and may still become a double tap.
    SingleTap,
    /// A second press arrived inside the double-tap window.
    SingleTapPressed,
}

/// Classifies normalized pointer samples into gesture samples.
///
/// Emitted gestures are buffered in a FIFO queue and consumed with
/// [`GestureRecognizer::read_gesture`]; insertion order is temporal order.
#[derive(Debug)]
pub struct GestureRecognizer {
    /// Distance that sustains a free drag once movement is classified.
    free_drag_distance: f64,
    queue: VecDeque<GestureSample>,
    /// Pressed pointers in arrival order, each holding its latest sample.
    active: Vec<PointerSample>,
    /// Snapshot of the tracked pointers at the end of the previous update.
    previous: Vec<PointerSample>,
    native_state: NativeState,
    /// Timestamp of the last native-state transition.
    state_changed_at: u64,
    mode: GestureKind,
    /// Location of the pending single tap.
    tap_location: Option<PointerSample>,
}

impl GestureRecognizer {
    /// Two pointers pressed within this interval start a pinch (ms).
    pub const PINCH_INTERVAL: u64 = 200;
    /// A press released within this interval counts as a tap (ms).
    pub const TAP_INTERVAL: u64 = 700;
    /// A second tap within this interval becomes a double tap (ms).
    pub const DOUBLE_TAP_INTERVAL: u64 = 200;
    /// A press held this long without movement becomes a hold (ms).
    pub const HOLD_INTERVAL: u64 = 700;
    /// Movement beyond this distance cancels a tap (surface units).
    pub const TAP_DISTANCE: f64 = 5.0;
    /// A second tap farther than this is two separate taps (surface units).
    pub const DOUBLE_TAP_DISTANCE: f64 = 30.0;
    /// Default for the instance-configurable free-drag distance.
    pub const DEFAULT_FREE_DRAG_DISTANCE: f64 = 5.0;

    /// Create a recognizer with the default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            free_drag_distance: Self::DEFAULT_FREE_DRAG_DISTANCE,
            queue: VecDeque::new(),
            active: Vec::new(),
            previous: Vec::new(),
            native_state: NativeState::None,
            state_changed_at: 0,
            mode: GestureKind::None,
            tap_location: None,
        }
    }

    /// Movement distance that sustains a free drag.
    #[must_use]
    pub fn free_drag_distance(&self) -> f64 {
        self.free_drag_distance
    }

    /// Set the movement distance that sustains a free drag.
    pub fn set_free_drag_distance(&mut self, distance: f64) {
        self.free_drag_distance = distance;
    }

    /// Whether at least one classified gesture is waiting to be read.
    #[must_use]
    pub fn is_gesture_available(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Dequeue the oldest pending gesture, if any. Never blocks.
    pub fn read_gesture(&mut self) -> Option<GestureSample> {
        self.queue.pop_front()
    }

    /// Drop all state and pending gestures, returning to the initial
    /// configuration (thresholds are kept).
    pub fn reset(&mut self) {
        self.queue.clear();
        self.active.clear();
        self.previous.clear();
        self.native_state = NativeState::None;
        self.state_changed_at = 0;
        self.mode = GestureKind::None;
        self.tap_location = None;
    }

    /// Feed one pointer sample.
    ///
    /// May synchronously enqueue zero, one, or multiple gesture samples.
    /// `Cancel`, `Leave` and `CaptureLost` reset the machine with no
    /// emission; `Enter` and `CaptureGained` are ignored.
    pub fn update(&mut self, sample: PointerSample) {
        match sample.phase {
            PointerPhase::Cancel | PointerPhase::Leave | PointerPhase::CaptureLost => {
                tracing::debug!(phase = ?sample.phase, "pointer stream interrupted, resetting");
                self.active.clear();
                self.previous.clear();
                self.native_state = NativeState::None;
                self.mode = GestureKind::None;
                self.tap_location = None;
                return;
            }
            PointerPhase::Enter | PointerPhase::CaptureGained => return,
            PointerPhase::Down | PointerPhase::Move | PointerPhase::Up => {}
        }

        self.track_pointer(sample);
        let touches = self.touches_snapshot(sample);
        let now = sample.timestamp;

        match self.mode {
            GestureKind::None => self.transition_none(&touches, sample, now),
            GestureKind::Pinch => self.transition_pinch(&touches, now),
            GestureKind::Hold => self.transition_hold(sample, now),
            GestureKind::HoldMove => self.transition_hold_move(sample, now),
            GestureKind::FreeDrag => self.transition_free_drag(sample, now),
            GestureKind::PinchComplete
            | GestureKind::HoldComplete
            | GestureKind::DragComplete
            | GestureKind::Tap
            | GestureKind::DoubleTap => {
                // Completion markers last a single update.
                self.mode = GestureKind::None;
            }
        }

        self.previous = touches;
        if sample.phase == PointerPhase::Up {
            self.active.retain(|p| p.pointer_id != sample.pointer_id);
        }
    }

    // ---- pointer bookkeeping ----------------------------------------------

    /// Fold the sample into the pressed-pointer table.
    fn track_pointer(&mut self, sample: PointerSample) {
        if let Some(slot) = self
            .active
            .iter_mut()
            .find(|p| p.pointer_id == sample.pointer_id)
        {
            *slot = sample;
        } else if sample.phase == PointerPhase::Down {
            self.active.push(sample);
        }
    }

    /// Current touches, the event's own pointer first.
    fn touches_snapshot(&self, sample: PointerSample) -> Vec<PointerSample> {
        let mut touches = vec![sample];
        touches.extend(
            self.active
                .iter()
                .filter(|p| p.pointer_id != sample.pointer_id)
                .copied(),
        );
        touches
    }

    /// Displacement of the sample against the previous snapshot of the same
    /// pointer; zero when the pointer was not previously tracked.
    fn delta_for(&self, sample: PointerSample) -> Vec2 {
        self.previous
            .iter()
            .find(|p| p.pointer_id == sample.pointer_id)
            .map_or(Vec2::ZERO, |prev| sample.position - prev.position)
    }

    fn set_native_state(&mut self, state: NativeState, now: u64) {
        if self.native_state == state {
            return;
        }
        tracing::trace!(from = ?self.native_state, to = ?state, now, "native state");
        self.native_state = state;
        self.state_changed_at = now;
    }

    fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.state_changed_at)
    }

    // ---- mode transitions --------------------------------------------------

    #[allow(clippy::too_many_lines)]
    fn transition_none(&mut self, touches: &[PointerSample], tl: PointerSample, now: u64) {
        if self.active.is_empty() {
            // Nothing pressed: the only pending work is flushing a tap whose
            // double-tap window expired.
            if self.native_state == NativeState::SingleTap
                && self.elapsed(now) > Self::DOUBLE_TAP_INTERVAL
            {
                self.set_native_state(NativeState::None, now);
                if let Some(tap) = self.tap_location.take() {
                    self.emit_tap(tap, now);
                }
            }
            return;
        }

        let delta = self.delta_for(tl);

        match self.native_state {
            NativeState::Pressed => match tl.phase {
                PointerPhase::Move => {
                    if self.elapsed(now) > Self::HOLD_INTERVAL {
                        // Hold timeout wins over distance when both trip at once.
                        self.set_native_state(NativeState::None, now);
                        self.emit_hold(tl, now);
                    } else if delta.length() > Self::TAP_DISTANCE {
                        self.set_native_state(NativeState::Moved, now);
                        // The drag starts from the previous sample, so the
                        // segment that crossed the threshold is not lost.
                        let origin = self.previous_primary(tl);
                        self.emit_free_drag(origin, now);
                    } else if Self::second_pointer_moving(touches) {
                        // Two pointers in motion: candidate pinch, no emission yet.
                        self.set_native_state(NativeState::Moved, now);
                    }
                }
                PointerPhase::Up => {
                    if self.elapsed(now) < Self::TAP_INTERVAL {
                        self.tap_location = Some(tl);
                        self.set_native_state(NativeState::SingleTap, now);
                    } else {
                        // Tap window expired silently.
                        self.set_native_state(NativeState::None, now);
                    }
                }
                PointerPhase::Down => self.set_native_state(NativeState::Pressed, now),
                _ => {}
            },
            NativeState::SingleTap => {
                if tl.phase == PointerPhase::Down {
                    let Some(tap) = self.tap_location else {
                        self.set_native_state(NativeState::Pressed, now);
                        return;
                    };
                    let d = (tl.position - tap.position).length();
                    if self.elapsed(now) < Self::DOUBLE_TAP_INTERVAL
                        && d < Self::DOUBLE_TAP_DISTANCE
                    {
                        self.set_native_state(NativeState::SingleTapPressed, now);
                    } else {
                        // Too late or too far: flush both as separate taps.
                        self.set_native_state(NativeState::None, now);
                        self.tap_location = None;
                        self.emit_tap(tap, now);
                        self.emit_tap(tl, now);
                    }
                }
            }
            NativeState::SingleTapPressed => match tl.phase {
                PointerPhase::Move => {
                    if self.elapsed(now) > Self::DOUBLE_TAP_INTERVAL {
                        self.set_native_state(NativeState::None, now);
                        if let Some(tap) = self.tap_location.take() {
                            self.emit_tap(tap, now);
                        }
                    }
                }
                PointerPhase::Up => {
                    let in_window = self.elapsed(now) < Self::DOUBLE_TAP_INTERVAL;
                    self.set_native_state(NativeState::None, now);
                    self.tap_location = None;
                    if in_window {
                        self.emit_double_tap(tl, now);
                    } else {
                        self.emit_tap(tl, now);
                    }
                }
                _ => {}
            },
            NativeState::None | NativeState::Moved => match tl.phase {
                PointerPhase::Down => self.set_native_state(NativeState::Pressed, now),
                PointerPhase::Move => {
                    if self.native_state == NativeState::Moved {
                        if self.elapsed(now) > Self::PINCH_INTERVAL
                            || delta.length() > self.free_drag_distance
                        {
                            // The pinch window lapsed (or the move is too
                            // large): this is a drag after all.
                            self.set_native_state(NativeState::None, now);
                            self.emit_free_drag(tl, now);
                        } else if Self::second_pointer_moving(touches) {
                            self.set_native_state(NativeState::None, now);
                            self.emit_pinch(touches, now);
                        }
                    } else {
                        self.set_native_state(NativeState::Moved, now);
                    }
                }
                _ => {}
            },
        }
    }

    fn transition_pinch(&mut self, touches: &[PointerSample], now: u64) {
        let finger_lifted = touches
            .iter()
            .take(2)
            .any(|t| t.phase == PointerPhase::Up);
        if finger_lifted {
            self.emit_pinch_complete(now);
        } else {
            self.emit_pinch(touches, now);
        }
    }

    fn transition_free_drag(&mut self, tl: PointerSample, now: u64) {
        if tl.phase == PointerPhase::Up {
            self.emit_drag_complete(now);
        } else {
            self.emit_free_drag(tl, now);
        }
    }

    fn transition_hold(&mut self, tl: PointerSample, now: u64) {
        match tl.phase {
            // A hold released without movement ends silently.
            PointerPhase::Up => self.mode = GestureKind::None,
            PointerPhase::Move => self.emit_hold_move(tl, now),
            _ => {}
        }
    }

    fn transition_hold_move(&mut self, tl: PointerSample, now: u64) {
        if tl.phase == PointerPhase::Up {
            self.emit_hold_complete(now);
        } else {
            self.emit_hold_move(tl, now);
        }
    }

    /// Whether either of the first two touches reports movement.
    fn second_pointer_moving(touches: &[PointerSample]) -> bool {
        touches.len() > 1
            && touches
                .iter()
                .take(2)
                .any(|t| t.phase == PointerPhase::Move)
    }

    /// Previous sample of the event's pointer, falling back to the event.
    fn previous_primary(&self, tl: PointerSample) -> PointerSample {
        self.previous
            .iter()
            .find(|p| p.pointer_id == tl.pointer_id)
            .copied()
            .unwrap_or(tl)
    }

    // ---- emissions ---------------------------------------------------------

    fn push(&mut self, sample: GestureSample) {
        tracing::debug!(kind = ?sample.kind, "gesture");
        self.queue.push_back(sample);
    }

    fn emit_free_drag(&mut self, location: PointerSample, now: u64) {
        self.mode = GestureKind::FreeDrag;
        let delta = self.delta_for(location);
        self.push(GestureSample::single(
            GestureKind::FreeDrag,
            location.position,
            delta,
            location.pointer_id,
            location.pressure,
            now,
        ));
    }

    fn emit_drag_complete(&mut self, now: u64) {
        self.mode = GestureKind::DragComplete;
        self.push(GestureSample::marker(GestureKind::DragComplete, now));
    }

    fn emit_pinch(&mut self, touches: &[PointerSample], now: u64) {
        self.mode = GestureKind::Pinch;
        let (Some(first), Some(second)) = (touches.first(), touches.get(1)) else {
            return;
        };
        let delta = self.delta_for(*first);
        let delta2 = self.delta_for(*second);
        if delta.length() > 0.0 || delta2.length() > 0.0 {
            self.push(GestureSample {
                kind: GestureKind::Pinch,
                position: first.position,
                position2: second.position,
                delta,
                delta2,
                position_id: first.pointer_id,
                position_id2: second.pointer_id,
                pressure_factor: first.pressure,
                pressure_factor2: second.pressure,
                timestamp: now,
            });
        }
    }

    fn emit_pinch_complete(&mut self, now: u64) {
        self.mode = GestureKind::PinchComplete;
        self.push(GestureSample::marker(GestureKind::PinchComplete, now));
    }

    fn emit_tap(&mut self, location: PointerSample, now: u64) {
        // Taps are instantaneous: the outer mode stays None.
        self.push(GestureSample::single(
            GestureKind::Tap,
            location.position,
            Vec2::ZERO,
            location.pointer_id,
            location.pressure,
            now,
        ));
    }

    fn emit_double_tap(&mut self, location: PointerSample, now: u64) {
        self.push(GestureSample::single(
            GestureKind::DoubleTap,
            location.position,
            Vec2::ZERO,
            location.pointer_id,
            location.pressure,
            now,
        ));
    }

    fn emit_hold(&mut self, location: PointerSample, now: u64) {
        self.mode = GestureKind::Hold;
        self.push(GestureSample::single(
            GestureKind::Hold,
            location.position,
            Vec2::ZERO,
            location.pointer_id,
            location.pressure,
            now,
        ));
    }

    fn emit_hold_move(&mut self, location: PointerSample, now: u64) {
        self.mode = GestureKind::HoldMove;
        let delta = self.delta_for(location);
        self.push(GestureSample::single(
            GestureKind::HoldMove,
            location.position,
            delta,
            location.pointer_id,
            location.pressure,
            now,
        ));
    }

    fn emit_hold_complete(&mut self, now: u64) {
        self.mode = GestureKind::HoldComplete;
        self.push(GestureSample::marker(GestureKind::HoldComplete, now));
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new()
    }
}
