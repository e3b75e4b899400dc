//! Canvas orchestration: gestures in, pixels out.
//!
//! [`PaintCanvas`] owns the full pipeline. Raw pointer samples go through
//! the recognizer; view gestures (pinch, double tap) are applied to the
//! pan/zoom transform immediately, while stroke gestures are queued and
//! consumed by [`PaintCanvas::draw`] so rendering can run on the caller's
//! frame cadence rather than per input event.

use std::collections::VecDeque;

use image::RgbaImage;
use paint_core::{
    Brush, BrushPoint, CoreResult, GestureKind, GestureRecognizer, GestureSample, PointerSample,
    Vec2,
};

use crate::layers::LayeredImage;
use crate::stroke::StrokeRenderer;

/// Pixels of pinch spread per doubling-ish of zoom; larger is slower.
pub const ZOOM_FACTOR: f64 = 250.0;

/// Hooks for undo history and damage tracking around stroke rendering.
///
/// All methods default to no-ops so implementors override only what they
/// record.
pub trait StrokeHistory {
    /// A stroke is about to be rendered.
    fn begin_stroke(&mut self) {}

    /// The current stroke finished.
    fn end_stroke(&mut self) {}

    /// A point (in canvas coordinates) was rendered.
    ///
    /// Called with the endpoints of each rendered segment, not with every
    /// imprint; intermediate imprints always lie inside the endpoints'
    /// bounding box.
    fn extend_dirty_region(&mut self, point: Vec2) {
        let _ = point;
    }
}

/// History sink that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl StrokeHistory for NoHistory {}

/// Hook points for hold gestures.
///
/// The canvas itself does nothing with holds; they are reserved for
/// collaborator features (color pickers, context menus). All methods
/// default to no-ops so implementors override only what they handle.
pub trait HoldHandler {
    /// The pointer was held in place past the hold interval.
    fn on_hold(&mut self, gesture: &GestureSample) {
        let _ = gesture;
    }

    /// The held pointer moved.
    fn on_hold_move(&mut self, gesture: &GestureSample) {
        let _ = gesture;
    }

    /// A hold-move ended.
    fn on_hold_complete(&mut self, gesture: &GestureSample) {
        let _ = gesture;
    }
}

/// Hold handler that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHoldHandler;

impl HoldHandler for NoHoldHandler {}

/// Axis-aligned damage rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirtyRegion {
    /// Smallest touched coordinate.
    pub min: Vec2,
    /// Largest touched coordinate.
    pub max: Vec2,
}

impl DirtyRegion {
    /// A region covering a single point.
    #[must_use]
    pub fn at(point: Vec2) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Grow the region to include `point`.
    pub fn extend(&mut self, point: Vec2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }
}

/// The painting engine facade.
///
/// Feed it raw [`PointerSample`]s with [`update`](Self::update), then call
/// [`draw`](Self::draw) once per frame to flush pending stroke gestures to
/// the active layer.
pub struct PaintCanvas {
    recognizer: GestureRecognizer,
    renderer: StrokeRenderer,
    brush: Brush,
    brush_texture: Option<RgbaImage>,
    image: LayeredImage,
    history: Box<dyn StrokeHistory>,
    hold_handler: Box<dyn HoldHandler>,
    stroke_queue: VecDeque<GestureSample>,
    last_rendered_point: Option<BrushPoint>,
    previous_pinch_length: f64,
    view_position: Vec2,
    view_origin: Vec2,
    view_scale: f64,
    double_tap_scale: f64,
    is_dragging: bool,
    dirty_region: Option<DirtyRegion>,
}

impl PaintCanvas {
    /// Create a canvas of the given pixel size with the default brush and
    /// no history sink.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            recognizer: GestureRecognizer::new(),
            renderer: StrokeRenderer::new(),
            brush: Brush::default(),
            brush_texture: None,
            image: LayeredImage::new(width, height),
            history: Box::new(NoHistory),
            hold_handler: Box::new(NoHoldHandler),
            stroke_queue: VecDeque::new(),
            last_rendered_point: None,
            previous_pinch_length: 0.0,
            view_position: Vec2::ZERO,
            view_origin: Vec2::ZERO,
            view_scale: 1.0,
            double_tap_scale: 3.0,
            is_dragging: false,
            dirty_region: None,
        }
    }

    /// Install a history sink, replacing the previous one.
    pub fn set_history(&mut self, history: Box<dyn StrokeHistory>) {
        self.history = history;
    }

    /// Install a hold handler, replacing the previous one.
    pub fn set_hold_handler(&mut self, handler: Box<dyn HoldHandler>) {
        self.hold_handler = handler;
    }

    /// The layered image being painted.
    #[must_use]
    pub fn image(&self) -> &LayeredImage {
        &self.image
    }

    /// Mutable access to the layered image (layer management).
    pub fn image_mut(&mut self) -> &mut LayeredImage {
        &mut self.image
    }

    /// The active brush.
    #[must_use]
    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Replace the active brush.
    ///
    /// # Errors
    ///
    /// Returns [`paint_core::CoreError::InvalidBrush`] if the brush fails
    /// validation; the previous brush stays active.
    pub fn set_brush(&mut self, brush: Brush) -> CoreResult<()> {
        brush.validate()?;
        tracing::debug!(name = %brush.name, size = brush.size, "brush changed");
        self.brush = brush;
        Ok(())
    }

    /// Set or clear the decoded brush texture.
    pub fn set_brush_texture(&mut self, texture: Option<RgbaImage>) {
        self.brush_texture = texture;
    }

    /// Mutable access to the recognizer (threshold tuning).
    pub fn recognizer_mut(&mut self) -> &mut GestureRecognizer {
        &mut self.recognizer
    }

    /// Current zoom scale.
    #[must_use]
    pub fn view_scale(&self) -> f64 {
        self.view_scale
    }

    /// Current view pan position in screen coordinates.
    #[must_use]
    pub fn view_position(&self) -> Vec2 {
        self.view_position
    }

    /// Canvas-space point the view transform is anchored on.
    #[must_use]
    pub fn view_origin(&self) -> Vec2 {
        self.view_origin
    }

    /// Map a screen-space position into canvas coordinates under the
    /// current pan/zoom transform.
    #[must_use]
    pub fn screen_to_canvas(&self, position: Vec2) -> Vec2 {
        self.view_origin + (position - self.view_position) / self.view_scale
    }

    /// Take the damage rectangle accumulated since the last call.
    pub fn take_dirty_region(&mut self) -> Option<DirtyRegion> {
        self.dirty_region.take()
    }

    /// Feed one raw pointer sample through the recognizer and apply any
    /// gestures it classified.
    pub fn update(&mut self, sample: PointerSample) {
        self.recognizer.update(sample);
        while let Some(gesture) = self.recognizer.read_gesture() {
            self.handle_gesture(&gesture);
        }
    }

    /// Render all queued stroke gestures to the active layer.
    pub fn draw(&mut self) {
        while let Some(gesture) = self.stroke_queue.pop_front() {
            match gesture.kind {
                GestureKind::Tap => self.draw_tap(&gesture),
                GestureKind::FreeDrag => self.draw_drag(&gesture),
                GestureKind::DragComplete => self.finish_drag(),
                _ => {}
            }
        }
    }

    /// Wipe every layer back to its initial content.
    pub fn clear(&mut self) {
        self.image.clear();
        self.dirty_region = Some(DirtyRegion {
            min: Vec2::ZERO,
            max: Vec2::new(f64::from(self.image.width()), f64::from(self.image.height())),
        });
    }

    fn handle_gesture(&mut self, gesture: &GestureSample) {
        if gesture.kind.is_stroke() {
            self.stroke_queue.push_back(*gesture);
            return;
        }
        match gesture.kind {
            GestureKind::Pinch => self.handle_pinch(gesture),
            GestureKind::PinchComplete => {
                self.previous_pinch_length = 0.0;
                self.double_tap_scale = self.view_scale;
                tracing::debug!(scale = self.view_scale, "pinch complete");
            }
            GestureKind::DoubleTap => self.handle_double_tap(gesture),
            GestureKind::Hold => self.hold_handler.on_hold(gesture),
            GestureKind::HoldMove => self.hold_handler.on_hold_move(gesture),
            GestureKind::HoldComplete => self.hold_handler.on_hold_complete(gesture),
            _ => {}
        }
    }

    /// Two-finger pan and zoom.
    ///
    /// The anchor is re-derived each sample so the canvas point under the
    /// pinch midpoint stays under the fingers while both pan and scale
    /// change.
    fn handle_pinch(&mut self, gesture: &GestureSample) {
        let midpoint = gesture.position.midpoint(gesture.position2);
        self.view_origin += (midpoint - self.view_position) / self.view_scale;
        let pan = (gesture.delta + gesture.delta2) / 2.0;
        self.view_position = midpoint + pan;

        let length = gesture.position.distance_to(gesture.position2);
        if self.previous_pinch_length > 0.0 {
            self.view_scale +=
                (length - self.previous_pinch_length) / ZOOM_FACTOR * self.view_scale;
        }
        self.previous_pinch_length = length;
    }

    /// Toggle between unit scale and the remembered zoom level.
    fn handle_double_tap(&mut self, gesture: &GestureSample) {
        if self.view_scale == 1.0 {
            self.view_scale = self.double_tap_scale;
            self.view_position = Vec2::new(
                f64::from(self.image.width()) / 2.0,
                f64::from(self.image.height()) / 2.0,
            );
            self.view_origin = gesture.position;
        } else {
            self.view_scale = 1.0;
            self.view_position = Vec2::ZERO;
            self.view_origin = Vec2::ZERO;
        }
        tracing::debug!(scale = self.view_scale, "double tap zoom");
    }

    fn draw_tap(&mut self, gesture: &GestureSample) {
        let point = self.to_brush_point(gesture);
        self.history.begin_stroke();
        self.renderer.draw_point(
            self.image.active_layer_mut(),
            &self.brush,
            self.brush_texture.as_ref(),
            &point,
        );
        self.mark_dirty(point.position());
        self.history.end_stroke();
        self.last_rendered_point = None;
    }

    fn draw_drag(&mut self, gesture: &GestureSample) {
        let point = self.to_brush_point(gesture);
        if self.is_dragging {
            let drawn = self.renderer.draw_line_from_last_point(
                self.image.active_layer_mut(),
                &self.brush,
                self.brush_texture.as_ref(),
                &point,
                false,
            );
            if drawn != self.last_rendered_point {
                if let Some(drawn) = drawn {
                    self.mark_dirty(drawn.position());
                }
            }
            self.last_rendered_point = drawn;
        } else {
            self.history.begin_stroke();
            self.renderer.draw_point(
                self.image.active_layer_mut(),
                &self.brush,
                self.brush_texture.as_ref(),
                &point,
            );
            self.mark_dirty(point.position());
            self.last_rendered_point = Some(point);
            self.is_dragging = true;
        }
    }

    fn finish_drag(&mut self) {
        if self.is_dragging {
            self.history.end_stroke();
        }
        self.renderer.clear_rendered_points();
        self.last_rendered_point = None;
        self.is_dragging = false;
    }

    /// Build the canvas-space brush point for a gesture sample, deriving
    /// speed from the previously rendered point.
    fn to_brush_point(&self, gesture: &GestureSample) -> BrushPoint {
        let position = self.screen_to_canvas(gesture.position);
        let mut point = BrushPoint::new(position, gesture.timestamp, gesture.pressure_factor);
        if let Some(last) = self.last_rendered_point {
            let elapsed = gesture.timestamp.saturating_sub(last.timestamp);
            if elapsed > 0 {
                point.speed = BrushPoint::distance(&last, &point) / elapsed as f64;
            } else {
                point.speed = last.speed;
            }
        }
        point
    }

    fn mark_dirty(&mut self, point: Vec2) {
        match &mut self.dirty_region {
            Some(region) => region.extend(point),
            None => self.dirty_region = Some(DirtyRegion::at(point)),
        }
        self.history.extend_dirty_region(point);
    }
}

impl std::fmt::Debug for PaintCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaintCanvas")
            .field("brush", &self.brush)
            .field("view_scale", &self.view_scale)
            .field("view_position", &self.view_position)
            .field("layers", &self.image.layer_count())
            .finish_non_exhaustive()
    }
}
