//! Stroke interpolation and rendering.
//!
//! A stroke is a sequence of brush imprints. [`draw_line`] fills the gap
//! between two brush points with evenly spaced imprints (fixed-step line
//! marching in surface units, not pixel stepping); [`StrokeRenderer`] keeps
//! the "last rendered point" continuity so callers can stream per-event
//! points without recomputing the whole stroke.

use image::RgbaImage;
use paint_core::{Brush, BrushPoint, Vec2};

use crate::surface::RasterSurface;

/// Draw a single brush imprint at `point`.
///
/// Skipped entirely when either coordinate is negative (clamped canvas
/// convention). The imprint size is
/// `minimum_size + curve(size - minimum_size) * pressure`, drawn as a solid
/// circle, or as a centered stretch-blit when a texture is supplied.
pub fn draw_imprint(
    surface: &mut dyn RasterSurface,
    brush: &Brush,
    texture: Option<&RgbaImage>,
    point: &BrushPoint,
) {
    if point.x < 0.0 || point.y < 0.0 {
        return;
    }
    let pressure = point.pressure_factor.max(0.0);
    let size = brush.minimum_size()
        + brush
            .expression_curve
            .apply(point, brush.size - brush.minimum_size())
            * pressure;

    if let Some(texture) = texture {
        let top_left = Vec2::new(point.x - size / 2.0, point.y - size / 2.0);
        surface.blit_scaled(
            texture,
            top_left,
            size,
            size,
            pressure * brush.color.alpha(),
            brush.composite_mode,
        );
    } else {
        surface.fill_circle(
            point.position(),
            size,
            brush.color,
            pressure,
            brush.composite_mode,
        );
    }
}

/// Draw the evenly spaced imprints connecting `p1` to `p2`.
///
/// Imprints are spaced by the brush's spacing distance, with speed and
/// pressure varying linearly between the endpoints, so the final imprint
/// may fall short of `p2`. The start point is drawn only when
/// `render_start_point` is true.
///
/// Returns the last imprint point actually drawn, or `None` if nothing was
/// drawn (degenerate input).
pub fn draw_line(
    surface: &mut dyn RasterSurface,
    brush: &Brush,
    texture: Option<&RgbaImage>,
    p1: &BrushPoint,
    p2: &BrushPoint,
    render_start_point: bool,
) -> Option<BrushPoint> {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let length = BrushPoint::distance(p1, p2);

    if length == 0.0 {
        // Degenerate segment: at most the start point.
        if render_start_point {
            draw_imprint(surface, brush, texture, p1);
            return Some(*p1);
        }
        return None;
    }

    let spacing = brush.spacing_distance();
    // An unvalidated brush with zero or NaN spacing would never step past
    // the segment end.
    if !spacing.is_finite() || spacing <= 0.0 {
        return None;
    }
    let step_count = length / spacing;
    let ds = (p2.speed - p1.speed) / step_count;
    let dp = (p2.pressure_factor - p1.pressure_factor) / step_count;

    let sign_x = if dx < 0.0 { -1.0 } else { 1.0 };
    let sign_y = if dy < 0.0 { -1.0 } else { 1.0 };
    let (min_x, max_x) = (p1.x.min(p2.x), p1.x.max(p2.x));
    let (min_y, max_y) = (p1.y.min(p2.y), p1.y.max(p2.y));

    if dx == 0.0 {
        // Vertical line: step along y only.
        return march(
            surface,
            brush,
            texture,
            *p1,
            0.0,
            spacing * sign_y,
            ds,
            dp,
            |p| min_y <= p.y && p.y <= max_y,
            render_start_point,
        );
    }
    if dy == 0.0 {
        // Horizontal line: step along x only.
        return march(
            surface,
            brush,
            texture,
            *p1,
            spacing * sign_x,
            0.0,
            ds,
            dp,
            |p| min_x <= p.x && p.x <= max_x,
            render_start_point,
        );
    }

    let slope = dy / dx;
    let step_x = (spacing * spacing / (slope * slope + 1.0)).sqrt() * sign_x;
    let step_y = slope * step_x;

    if dx.abs() > dy.abs() {
        // x is the dominant axis; the y interval check is redundant.
        march(
            surface,
            brush,
            texture,
            *p1,
            step_x,
            step_y,
            ds,
            dp,
            |p| min_x <= p.x && p.x <= max_x,
            render_start_point,
        )
    } else {
        march(
            surface,
            brush,
            texture,
            *p1,
            step_x,
            step_y,
            ds,
            dp,
            |p| min_y <= p.y && p.y <= max_y,
            render_start_point,
        )
    }
}

/// Walk from `start` in fixed increments, drawing an imprint at each step
/// until the walking point exits the segment's bounding interval.
///
/// The start point itself is drawn only when `render_start_point` is true;
/// all stepped points are always drawn.
#[allow(clippy::too_many_arguments)]
fn march(
    surface: &mut dyn RasterSurface,
    brush: &Brush,
    texture: Option<&RgbaImage>,
    start: BrushPoint,
    step_x: f64,
    step_y: f64,
    ds: f64,
    dp: f64,
    within: impl Fn(&BrushPoint) -> bool,
    render_start_point: bool,
) -> Option<BrushPoint> {
    let mut point = start;
    let mut last = None;
    let mut is_start = true;

    loop {
        if !is_start || render_start_point {
            draw_imprint(surface, brush, texture, &point);
            last = Some(point);
        }
        is_start = false;

        point.x += step_x;
        point.y += step_y;
        point.speed += ds;
        point.pressure_factor += dp;

        if !within(&point) {
            break;
        }
    }

    last
}

/// Stateful stroke renderer.
///
/// Maintains the last rendered point between calls so a caller can stream
/// points one at a time and still get correctly spaced imprints.
#[derive(Debug, Default)]
pub struct StrokeRenderer {
    last_rendered_point: Option<BrushPoint>,
}

impl StrokeRenderer {
    /// Create a renderer with no continuity state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last point drawn, if a stroke is in progress.
    #[must_use]
    pub fn last_rendered_point(&self) -> Option<BrushPoint> {
        self.last_rendered_point
    }

    /// Draw a single imprint, resetting continuity to this point.
    pub fn draw_point(
        &mut self,
        surface: &mut dyn RasterSurface,
        brush: &Brush,
        texture: Option<&RgbaImage>,
        point: &BrushPoint,
    ) {
        self.clear_rendered_points();
        draw_imprint(surface, brush, texture, point);
        self.last_rendered_point = Some(*point);
    }

    /// Draw a line between two explicit points, resetting continuity first.
    pub fn draw_line(
        &mut self,
        surface: &mut dyn RasterSurface,
        brush: &Brush,
        texture: Option<&RgbaImage>,
        p1: &BrushPoint,
        p2: &BrushPoint,
        render_start_point: bool,
    ) -> Option<BrushPoint> {
        self.clear_rendered_points();
        let last = draw_line(surface, brush, texture, p1, p2, render_start_point);
        self.last_rendered_point = last;
        last
    }

    /// Continue the stroke from the last rendered point to `p`.
    ///
    /// When `p` is within the brush's spacing distance of the last point,
    /// nothing is drawn and the last point is returned unchanged - drawing
    /// is deferred until enough distance accumulates. With no prior point,
    /// `p` becomes both endpoints.
    pub fn draw_line_from_last_point(
        &mut self,
        surface: &mut dyn RasterSurface,
        brush: &Brush,
        texture: Option<&RgbaImage>,
        p: &BrushPoint,
        render_start_point: bool,
    ) -> Option<BrushPoint> {
        let Some(p1) = self.last_rendered_point else {
            let drawn = draw_line(surface, brush, texture, p, p, render_start_point);
            self.last_rendered_point = Some(drawn.unwrap_or(*p));
            return self.last_rendered_point;
        };

        if BrushPoint::distance(&p1, p) <= brush.spacing_distance() {
            // Under-sampling guard: wait for more distance.
            return Some(p1);
        }

        let last = draw_line(surface, brush, texture, &p1, p, render_start_point);
        self.last_rendered_point = last;
        last
    }

    /// Forget the continuity state (used at stroke boundaries).
    pub fn clear_rendered_points(&mut self) {
        self.last_rendered_point = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixmap::PixmapSurface;
    use paint_core::{Color, CompositeMode};

    /// Surface that records imprint centers instead of rasterizing.
    #[derive(Default)]
    struct RecordingSurface {
        circles: Vec<(Vec2, f64)>,
    }

    impl RasterSurface for RecordingSurface {
        fn width(&self) -> u32 {
            1024
        }

        fn height(&self) -> u32 {
            1024
        }

        fn fill_circle(
            &mut self,
            center: Vec2,
            radius: f64,
            _color: Color,
            _alpha: f64,
            _mode: CompositeMode,
        ) {
            self.circles.push((center, radius));
        }

        fn blit_scaled(
            &mut self,
            _texture: &RgbaImage,
            dst: Vec2,
            dst_w: f64,
            _dst_h: f64,
            _alpha: f64,
            _mode: CompositeMode,
        ) {
            self.circles
                .push((Vec2::new(dst.x + dst_w / 2.0, dst.y + dst_w / 2.0), dst_w));
        }

        fn fill(&mut self, _color: Color) {}

        fn clear(&mut self) {}
    }

    fn test_brush() -> Brush {
        Brush {
            size: 12.0,
            minimum_size_ratio: 0.1,
            distance_ratio: 0.1,
            ..Brush::default()
        }
    }

    fn point(x: f64, y: f64) -> BrushPoint {
        BrushPoint::new(Vec2::new(x, y), 0, 1.0)
    }

    #[test]
    fn test_horizontal_line_imprint_count_and_spacing() {
        // size 12, spacing ratio 0.1 -> spacing 1.2; length 12 -> 11 imprints
        // at x = 0, 1.2, 2.4, ..., 12.0, each of size 12.
        let brush = test_brush();
        let mut surface = RecordingSurface::default();
        let last = draw_line(
            &mut surface,
            &brush,
            None,
            &point(0.0, 0.0),
            &point(12.0, 0.0),
            true,
        );

        assert_eq!(surface.circles.len(), 11);
        for (i, (center, radius)) in surface.circles.iter().enumerate() {
            assert!((center.x - 1.2 * i as f64).abs() < 1e-9);
            assert_eq!(center.y, 0.0);
            // pressure 1 throughout: full size.
            assert!((radius - 12.0).abs() < 1e-9);
        }
        assert!((last.expect("drawn").x - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_skipping_start_point_draws_one_fewer() {
        let brush = test_brush();
        let mut surface = RecordingSurface::default();
        draw_line(
            &mut surface,
            &brush,
            None,
            &point(0.0, 0.0),
            &point(12.0, 0.0),
            false,
        );
        assert_eq!(surface.circles.len(), 10);
        assert!((surface.circles[0].0.x - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_vertical_line_steps_along_y() {
        // Default brush: spacing exactly 1.0.
        let brush = Brush::default();
        let mut surface = RecordingSurface::default();
        draw_line(
            &mut surface,
            &brush,
            None,
            &point(5.0, 0.0),
            &point(5.0, 6.0),
            true,
        );
        assert_eq!(surface.circles.len(), 7);
        assert!(surface.circles.iter().all(|(c, _)| c.x == 5.0));
    }

    #[test]
    fn test_diagonal_line_keeps_even_spacing() {
        let brush = test_brush();
        let mut surface = RecordingSurface::default();
        draw_line(
            &mut surface,
            &brush,
            None,
            &point(0.0, 0.0),
            &point(30.0, 40.0),
            true,
        );
        let spacing = brush.spacing_distance();
        for pair in surface.circles.windows(2) {
            let gap = pair[0].0.distance_to(pair[1].0);
            assert!((gap - spacing).abs() < 1e-9);
        }
    }

    #[test]
    fn test_pressure_interpolates_linearly() {
        let brush = test_brush();
        let mut surface = RecordingSurface::default();
        let p1 = BrushPoint::new(Vec2::new(0.0, 0.0), 0, 0.0);
        let p2 = BrushPoint::new(Vec2::new(12.0, 0.0), 0, 1.0);
        draw_line(&mut surface, &brush, None, &p1, &p2, true);

        // Radii grow monotonically from minimum toward full size.
        let radii: Vec<f64> = surface.circles.iter().map(|(_, r)| *r).collect();
        assert!(radii.windows(2).all(|w| w[1] > w[0]));
        assert!((radii[0] - brush.minimum_size()).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_segment() {
        let brush = test_brush();
        let mut surface = RecordingSurface::default();
        let p = point(3.0, 3.0);
        assert!(draw_line(&mut surface, &brush, None, &p, &p, false).is_none());
        assert!(surface.circles.is_empty());

        let last = draw_line(&mut surface, &brush, None, &p, &p, true);
        assert_eq!(last, Some(p));
        assert_eq!(surface.circles.len(), 1);
    }

    #[test]
    fn test_degenerate_spacing_draws_nothing() {
        // Unvalidated brushes must not hang the interpolator.
        let mut surface = RecordingSurface::default();
        for distance_ratio in [0.0, f64::NAN] {
            let brush = Brush {
                distance_ratio,
                ..test_brush()
            };
            let last = draw_line(
                &mut surface,
                &brush,
                None,
                &point(0.0, 0.0),
                &point(12.0, 0.0),
                true,
            );
            assert!(last.is_none());
        }
        assert!(surface.circles.is_empty());
    }

    #[test]
    fn test_negative_coordinates_skip_imprint() {
        let brush = test_brush();
        let mut surface = RecordingSurface::default();
        draw_imprint(&mut surface, &brush, None, &point(-1.0, 5.0));
        draw_imprint(&mut surface, &brush, None, &point(5.0, -0.1));
        assert!(surface.circles.is_empty());
    }

    #[test]
    fn test_imprint_size_formula() {
        let brush = test_brush();
        let mut surface = RecordingSurface::default();
        draw_imprint(
            &mut surface,
            &brush,
            None,
            &BrushPoint::new(Vec2::new(5.0, 5.0), 0, 0.5),
        );
        // 1.2 + (12 - 1.2) * 0.5
        assert!((surface.circles[0].1 - 6.6).abs() < 1e-9);
    }

    #[test]
    fn test_draw_line_from_last_point_defers_within_spacing() {
        let brush = test_brush();
        let mut surface = RecordingSurface::default();
        let mut renderer = StrokeRenderer::new();

        renderer.draw_point(&mut surface, &brush, None, &point(0.0, 0.0));
        assert_eq!(surface.circles.len(), 1);

        // Within spacing distance (1.2): nothing drawn, last point unchanged.
        let last = renderer.draw_line_from_last_point(
            &mut surface,
            &brush,
            None,
            &point(1.0, 0.0),
            false,
        );
        assert_eq!(last, Some(point(0.0, 0.0)));
        assert_eq!(surface.circles.len(), 1);

        // Beyond spacing distance: imprints appear and continuity advances.
        let last = renderer.draw_line_from_last_point(
            &mut surface,
            &brush,
            None,
            &point(3.0, 0.0),
            false,
        );
        assert!(surface.circles.len() > 1);
        assert!(last.expect("drawn").x > 0.0);
        assert_eq!(renderer.last_rendered_point(), last);
    }

    #[test]
    fn test_draw_line_from_last_point_without_prior_point() {
        let brush = test_brush();
        let mut surface = RecordingSurface::default();
        let mut renderer = StrokeRenderer::new();

        let p = point(4.0, 4.0);
        let last = renderer.draw_line_from_last_point(&mut surface, &brush, None, &p, false);
        // p becomes both endpoints: nothing drawn beyond p itself.
        assert_eq!(last, Some(p));
        assert!(surface.circles.is_empty());
    }

    #[test]
    fn test_textured_imprint_rasterizes() {
        let brush = Brush {
            texture: Some("round".to_string()),
            ..test_brush()
        };
        let mut texture = RgbaImage::new(4, 4);
        for px in texture.pixels_mut() {
            *px = image::Rgba([0, 0, 0, 255]);
        }
        let mut surface = PixmapSurface::new(32, 32);
        draw_imprint(
            &mut surface,
            &brush,
            Some(&texture),
            &BrushPoint::new(Vec2::new(16.0, 16.0), 0, 1.0),
        );
        assert!(surface.image().get_pixel(16, 16)[3] > 0);
    }
}
