use crate::foundation::core::{Affine, BezPath, Point, Rect};
use crate::theme::color::Color;
use kurbo::Shape;
use smallvec::SmallVec;

/// Flattening tolerance used when converting curves to paths, in layout pixels.
pub const PATH_TOLERANCE: f64 = 0.1;

/// Colour stop of a gradient paint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position in `[0, 1]`.
    pub offset: f64,
    /// Colour at `offset`.
    pub color: Color,
}

/// Stops of a gradient, ordered by offset.
pub type GradientStops = SmallVec<[GradientStop; 4]>;

/// How a shape is filled.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    /// One colour.
    Solid(Color),
    /// Linear gradient between two points.
    Linear {
        /// Position of offset `0`.
        start: Point,
        /// Position of offset `1`.
        end: Point,
        /// Stops.
        stops: GradientStops,
    },
    /// Radial gradient around `center`.
    Radial {
        /// Position of offset `0`.
        center: Point,
        /// Distance of offset `1`.
        radius: f64,
        /// Stops.
        stops: GradientStops,
    },
}

impl Paint {
    /// Two-stop vertical gradient from `top` at `y0` to `bottom` at `y1`.
    pub fn vertical(y0: f64, y1: f64, top: Color, bottom: Color) -> Self {
        Paint::Linear {
            start: Point::new(0.0, y0),
            end: Point::new(0.0, y1),
            stops: stops([(0.0, top), (1.0, bottom)]),
        }
    }

    /// Radial glow from `inner` at the centre to transparent at `radius`.
    pub fn glow(center: Point, radius: f64, inner: Color) -> Self {
        Paint::Radial {
            center,
            radius,
            stops: stops([(0.0, inner), (1.0, inner.fade(0.0))]),
        }
    }

    /// Colour at gradient position `t` (clamped). Solid paints ignore `t`.
    pub fn sample(&self, t: f64) -> Color {
        match self {
            Paint::Solid(c) => *c,
            Paint::Linear { stops, .. } | Paint::Radial { stops, .. } => sample_stops(stops, t),
        }
    }

    fn transform(&mut self, affine: Affine, k: f64) {
        match self {
            Paint::Solid(_) => {}
            Paint::Linear { start, end, .. } => {
                *start = affine * *start;
                *end = affine * *end;
            }
            Paint::Radial { center, radius, .. } => {
                *center = affine * *center;
                *radius *= k;
            }
        }
    }
}

/// Build gradient stops from `(offset, color)` pairs.
pub fn stops<I: IntoIterator<Item = (f64, Color)>>(pairs: I) -> GradientStops {
    pairs
        .into_iter()
        .map(|(offset, color)| GradientStop {
            offset: offset.clamp(0.0, 1.0),
            color,
        })
        .collect()
}

fn sample_stops(stops: &[GradientStop], t: f64) -> Color {
    let Some(first) = stops.first() else {
        return Color::TRANSPARENT;
    };
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            if span <= f64::EPSILON {
                return b.color;
            }
            return a.color.mix(b.color, (t - a.offset) / span);
        }
    }
    stops[stops.len() - 1].color
}

/// One recorded drawing command. Coordinates are layout pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    /// Fill the whole surface.
    Clear(Color),
    /// Fill an axis-aligned rectangle.
    FillRect {
        /// Rectangle.
        rect: Rect,
        /// Fill.
        paint: Paint,
    },
    /// Fill a closed path (non-zero winding).
    FillPath {
        /// Path.
        path: BezPath,
        /// Fill.
        paint: Paint,
    },
    /// Stroke a path with round caps and joins.
    StrokePath {
        /// Path.
        path: BezPath,
        /// Line width.
        width: f64,
        /// Fill of the stroke outline.
        paint: Paint,
    },
    /// Start a group composited at `opacity`.
    PushOpacity(f32),
    /// End the innermost group.
    PopLayer,
}

/// Ordered list of drawing commands produced by a scene for one frame.
///
/// Recipes record into a list; a [`crate::render::backend::RenderBackend`] rasterizes it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    cmds: Vec<DrawCmd>,
    open_layers: u32,
}

impl DisplayList {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands. Unbalanced opacity groups are closed by the backend.
    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    /// Return `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Drop every command, keeping the allocation.
    pub fn reset(&mut self) {
        self.cmds.clear();
        self.open_layers = 0;
    }

    /// Opacity groups still open.
    pub fn open_layers(&self) -> u32 {
        self.open_layers
    }

    /// Fill the surface with `color`.
    pub fn clear(&mut self, color: Color) {
        self.cmds.push(DrawCmd::Clear(color));
    }

    /// Fill `rect`.
    pub fn fill_rect(&mut self, rect: Rect, paint: Paint) {
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        self.cmds.push(DrawCmd::FillRect { rect, paint });
    }

    /// Fill `path`.
    pub fn fill_path(&mut self, path: BezPath, paint: Paint) {
        if path.elements().is_empty() {
            return;
        }
        self.cmds.push(DrawCmd::FillPath { path, paint });
    }

    /// Fill a circle. Non-positive radii draw nothing.
    pub fn fill_circle(&mut self, center: Point, radius: f64, paint: Paint) {
        if !(radius.is_finite() && radius > 0.0) {
            return;
        }
        let circle = kurbo::Circle::new(center, radius);
        self.fill_path(circle.to_path(PATH_TOLERANCE), paint);
    }

    /// Fill an axis-aligned ellipse.
    pub fn fill_ellipse(&mut self, center: Point, rx: f64, ry: f64, paint: Paint) {
        if !(rx.is_finite() && ry.is_finite() && rx > 0.0 && ry > 0.0) {
            return;
        }
        let e = kurbo::Ellipse::new(center, (rx, ry), 0.0);
        self.fill_path(e.to_path(PATH_TOLERANCE), paint);
    }

    /// Stroke `path` with `width`.
    pub fn stroke_path(&mut self, path: BezPath, width: f64, paint: Paint) {
        if path.elements().is_empty() || !(width.is_finite() && width > 0.0) {
            return;
        }
        self.cmds.push(DrawCmd::StrokePath { path, width, paint });
    }

    /// Stroke the segment `a`-`b` in a solid colour.
    pub fn stroke_line(&mut self, a: Point, b: Point, width: f64, color: Color) {
        let mut path = BezPath::new();
        path.move_to(a);
        path.line_to(b);
        self.stroke_path(path, width, Paint::Solid(color));
    }

    /// Stroke an ellipse outline.
    pub fn stroke_ellipse(&mut self, center: Point, rx: f64, ry: f64, width: f64, color: Color) {
        if !(rx.is_finite() && ry.is_finite() && rx > 0.0 && ry > 0.0) {
            return;
        }
        let e = kurbo::Ellipse::new(center, (rx, ry), 0.0);
        self.stroke_path(e.to_path(PATH_TOLERANCE), width, Paint::Solid(color));
    }

    /// Open an opacity group. Fully opaque groups are elided.
    pub fn push_opacity(&mut self, opacity: f32) -> bool {
        let opacity = if opacity.is_finite() { opacity.clamp(0.0, 1.0) } else { 1.0 };
        if opacity >= 1.0 {
            return false;
        }
        self.cmds.push(DrawCmd::PushOpacity(opacity));
        self.open_layers += 1;
        true
    }

    /// Close the innermost group. Extra calls are ignored.
    pub fn pop_layer(&mut self) {
        if self.open_layers == 0 {
            return;
        }
        self.open_layers -= 1;
        self.cmds.push(DrawCmd::PopLayer);
    }

    /// Map every recorded command through `affine` (scale and translation).
    ///
    /// Widths and radii scale by the geometric mean of the axis scales.
    pub fn transform(&mut self, affine: Affine) {
        if affine == Affine::IDENTITY {
            return;
        }
        let k = affine.determinant().abs().sqrt();
        for cmd in &mut self.cmds {
            match cmd {
                DrawCmd::Clear(_) | DrawCmd::PushOpacity(_) | DrawCmd::PopLayer => {}
                DrawCmd::FillRect { rect, paint } => {
                    *rect = affine.transform_rect_bbox(*rect);
                    paint.transform(affine, k);
                }
                DrawCmd::FillPath { path, paint } => {
                    path.apply_affine(affine);
                    paint.transform(affine, k);
                }
                DrawCmd::StrokePath { path, width, paint } => {
                    path.apply_affine(affine);
                    *width *= k;
                    paint.transform(affine, k);
                }
            }
        }
    }

    /// Record `f` inside an opacity group.
    pub fn with_opacity(&mut self, opacity: f32, f: impl FnOnce(&mut DisplayList)) {
        let pushed = self.push_opacity(opacity);
        f(self);
        if pushed {
            self.pop_layer();
        }
    }
}

/// Closed polygon through `points`.
pub fn polygon<I: IntoIterator<Item = Point>>(points: I) -> BezPath {
    let mut path = BezPath::new();
    let mut first = true;
    for p in points {
        if first {
            path.move_to(p);
            first = false;
        } else {
            path.line_to(p);
        }
    }
    if !first {
        path.close_path();
    }
    path
}

/// Open polyline through `points`.
pub fn polyline<I: IntoIterator<Item = Point>>(points: I) -> BezPath {
    let mut path = BezPath::new();
    let mut first = true;
    for p in points {
        if first {
            path.move_to(p);
            first = false;
        } else {
            path.line_to(p);
        }
    }
    path
}

/// Closed smooth curve through `points` using quadratic segments between midpoints.
pub fn smooth_closed(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let n = points.len();
    if n < 3 {
        return path;
    }
    let mid = |a: Point, b: Point| a.midpoint(b);
    path.move_to(mid(points[n - 1], points[0]));
    for i in 0..n {
        let p = points[i];
        let next = points[(i + 1) % n];
        path.quad_to(p, mid(p, next));
    }
    path.close_path();
    path
}

#[cfg(test)]
#[path = "../../tests/unit/render/display_list.rs"]
mod tests;
