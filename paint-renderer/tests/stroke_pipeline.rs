//! End-to-end pipeline tests: raw pointer samples in, painted pixels out.

use std::cell::RefCell;
use std::rc::Rc;

use paint_core::{PointerPhase, PointerSample, Vec2};
use paint_renderer::{PaintCanvas, StrokeHistory};

fn sample(phase: PointerPhase, x: f64, y: f64, t: u64) -> PointerSample {
    PointerSample::new(phase, Vec2::new(x, y), 1, t)
}

fn alpha_at(canvas: &PaintCanvas, x: u32, y: u32) -> u8 {
    canvas.image().layer(1).image().get_pixel(x, y)[3]
}

#[test]
fn test_drag_paints_a_stroke_on_the_active_layer() {
    let mut canvas = PaintCanvas::new(128, 128);

    canvas.update(sample(PointerPhase::Down, 10.0, 64.0, 0));
    canvas.update(sample(PointerPhase::Move, 40.0, 64.0, 30));
    canvas.update(sample(PointerPhase::Move, 70.0, 64.0, 60));
    canvas.update(sample(PointerPhase::Up, 70.0, 64.0, 90));
    canvas.draw();

    // The whole swept segment is covered, not just the event positions.
    assert!(alpha_at(&canvas, 10, 64) > 0);
    assert!(alpha_at(&canvas, 25, 64) > 0);
    assert!(alpha_at(&canvas, 55, 64) > 0);
    // Far from the stroke stays clean.
    assert_eq!(alpha_at(&canvas, 10, 10), 0);

    let region = canvas.take_dirty_region().expect("stroke dirtied the canvas");
    assert!(region.min.x <= 10.0);
    assert!(region.max.x >= 55.0);
}

#[test]
fn test_flatten_composites_stroke_over_background() {
    let mut canvas = PaintCanvas::new(64, 64);
    canvas.update(sample(PointerPhase::Down, 10.0, 32.0, 0));
    canvas.update(sample(PointerPhase::Move, 50.0, 32.0, 30));
    canvas.update(sample(PointerPhase::Up, 50.0, 32.0, 60));
    canvas.draw();

    let flat = canvas.image().flatten();
    // Default black brush over the white background.
    assert!(flat.get_pixel(30, 32)[0] < 64);
    assert_eq!(flat.get_pixel(30, 32)[3], 255);
    assert_eq!(flat.get_pixel(5, 5).0, [255, 255, 255, 255]);
}

#[test]
fn test_clear_restores_blank_canvas() {
    let mut canvas = PaintCanvas::new(64, 64);
    canvas.update(sample(PointerPhase::Down, 10.0, 32.0, 0));
    canvas.update(sample(PointerPhase::Move, 50.0, 32.0, 30));
    canvas.update(sample(PointerPhase::Up, 50.0, 32.0, 60));
    canvas.draw();
    assert!(alpha_at(&canvas, 30, 32) > 0);

    canvas.clear();
    assert_eq!(alpha_at(&canvas, 30, 32), 0);
    let flat = canvas.image().flatten();
    assert_eq!(flat.get_pixel(30, 32).0, [255, 255, 255, 255]);
}

#[derive(Default)]
struct Counts {
    begins: usize,
    ends: usize,
}

struct CountingHistory(Rc<RefCell<Counts>>);

impl StrokeHistory for CountingHistory {
    fn begin_stroke(&mut self) {
        self.0.borrow_mut().begins += 1;
    }

    fn end_stroke(&mut self) {
        self.0.borrow_mut().ends += 1;
    }
}

#[test]
fn test_two_drags_produce_two_history_strokes() {
    let counts = Rc::new(RefCell::new(Counts::default()));
    let mut canvas = PaintCanvas::new(128, 128);
    canvas.set_history(Box::new(CountingHistory(Rc::clone(&counts))));

    canvas.update(sample(PointerPhase::Down, 10.0, 20.0, 0));
    canvas.update(sample(PointerPhase::Move, 40.0, 20.0, 30));
    canvas.update(sample(PointerPhase::Up, 40.0, 20.0, 60));
    canvas.draw();

    // A hover move lets the completion marker pass before the next press.
    canvas.update(sample(PointerPhase::Move, 40.0, 20.0, 400));

    canvas.update(sample(PointerPhase::Down, 10.0, 80.0, 500));
    canvas.update(sample(PointerPhase::Move, 40.0, 80.0, 530));
    canvas.update(sample(PointerPhase::Up, 40.0, 80.0, 560));
    canvas.draw();

    let counts = counts.borrow();
    assert_eq!(counts.begins, 2);
    assert_eq!(counts.ends, 2);
}

#[test]
fn test_pinch_zoom_shifts_where_strokes_land() {
    let mut canvas = PaintCanvas::new(128, 128);

    // Spread two fingers to zoom in.
    canvas.update(sample(PointerPhase::Down, 40.0, 64.0, 0));
    canvas.update(PointerSample::new(
        PointerPhase::Down,
        Vec2::new(90.0, 64.0),
        2,
        10,
    ));
    canvas.update(sample(PointerPhase::Move, 40.0, 64.0, 20));
    canvas.update(PointerSample::new(
        PointerPhase::Move,
        Vec2::new(90.0, 64.0),
        2,
        30,
    ));
    canvas.update(PointerSample::new(
        PointerPhase::Move,
        Vec2::new(120.0, 64.0),
        2,
        40,
    ));
    canvas.update(PointerSample::new(
        PointerPhase::Move,
        Vec2::new(130.0, 64.0),
        2,
        45,
    ));
    canvas.update(sample(PointerPhase::Up, 40.0, 64.0, 50));
    assert!(canvas.view_scale() > 1.0);

    // Screen and canvas coordinates now disagree.
    let canvas_point = canvas.screen_to_canvas(Vec2::new(64.0, 64.0));
    assert_ne!(canvas_point, Vec2::new(64.0, 64.0));
}
