use crate::foundation::core::{Point, Point3, Rect, Vec2};
use crate::foundation::error::SceneResult;
use crate::layout::budget::Budget;
use crate::layout::subdivide::{SplitPolicy, SubdivisionParams, subdivide};
use crate::render::display_list::{DisplayList, PATH_TOLERANCE, Paint, polygon, polyline};
use crate::rng::{Random, SeedRng};
use crate::scene::config::SceneConfig;
use crate::scene::model::{Entity, EntityKind, SceneKind, TileShape, WorldDescription};
use crate::scene::registry::{FrameCtx, Fit, SceneRecipe, WORLD_HEIGHT, WORLD_WIDTH, world_bounds};
use crate::theme::color::Color;
use kurbo::{BezPath, Circle, Shape};
use std::f64::consts::FRAC_PI_2;

/// Maximum subdivision depth.
pub const BUDGET: Budget = Budget::new(8, 12);

/// Share of the frame height left empty above the pattern.
pub const CLEAR_TOP: f64 = 0.33;
const EMPTY_CHANCE: f64 = 0.05;
const MARGIN: f64 = 2.0;
/// Accent slots plus white.
const COLORS: usize = 7;

const LINE_WIDTH: f64 = 3.0;
const ZIGZAG_STEP: f64 = 10.0;
const ZIGZAG_JAG: f64 = 5.0;
const ZIGZAG_ROW: f64 = 15.0;
const SQUIGGLE_FREQ: f64 = 0.5;
const SQUIGGLE_AMP: f64 = 4.0;
const SQUIGGLE_SPACING: f64 = 12.0;
const STRIPE_SPACING: f64 = 8.0;
const STRIPE_WIDTH: f64 = 4.0;
const DOT_GAP: f64 = 12.0;
const DOT_RADIUS: f64 = 3.0;
const ARC_STEPS: usize = 16;

/// Static Memphis-style pattern of subdivided tiles.
#[derive(Clone, Copy, Debug, Default)]
pub struct TiledPattern;

impl SceneRecipe for TiledPattern {
    fn kind(&self) -> SceneKind {
        SceneKind::TiledPattern
    }

    fn budget(&self) -> Budget {
        BUDGET
    }

    /// Subdivision draws first, then per cell: empty roll, colour, shape, and a corner for
    /// corner-anchored shapes.
    fn generate(&self, rng: &mut SeedRng, config: &SceneConfig) -> SceneResult<WorldDescription> {
        let depth = BUDGET.resolve(config.density, "tile depth") as u32;
        let mut world = WorldDescription::new(SceneKind::TiledPattern, world_bounds());
        let cells = subdivide(
            rng,
            pattern_region(),
            &SubdivisionParams {
                max_depth: depth,
                min_size: 40.0,
                gap: MARGIN,
                ratio_jitter: 0.0,
                early_stop: true,
                policy: SplitPolicy::LongestAxis,
            },
        );
        for cell in cells {
            if rng.next_f64() > 1.0 - EMPTY_CHANCE {
                continue;
            }
            let color = rng.below(COLORS);
            let shape = TileShape::ALL[rng.below(TileShape::ALL.len())];
            let corner = match shape {
                TileShape::Triangle | TileShape::QuarterCircle => rng.below(4) as u8,
                _ => 0,
            };
            let r = cell.rect;
            world.entities.push(Entity::fixed(
                EntityKind::Cell { shape, corner },
                Point3::new(r.x0, r.y0, f64::from(cell.depth)),
                Vec2::new(r.width(), r.height()),
                color as u32,
            ));
        }
        Ok(world)
    }

    fn animated(&self) -> bool {
        false
    }

    fn fit(&self) -> Fit {
        Fit::Stretch
    }

    fn draw(&self, out: &mut DisplayList, frame: &FrameCtx<'_>) {
        out.clear(Color::BLACK);
        for e in &frame.world.entities {
            let EntityKind::Cell { shape, corner } = e.kind else {
                continue;
            };
            let rect = Rect::from_origin_size(e.position.xy(), (e.extent.x, e.extent.y));
            let color = match e.style_seed as usize {
                i if i < COLORS - 1 => frame.theme.accent(i),
                _ => Color::WHITE,
            };
            draw_tile(out, rect, shape, corner, color);
        }
    }
}

/// Area the subdivision fills: the frame below the clear band, inset by the gap.
pub fn pattern_region() -> Rect {
    let top = WORLD_HEIGHT * CLEAR_TOP;
    Rect::new(MARGIN, top, WORLD_WIDTH - MARGIN, WORLD_HEIGHT - MARGIN)
}

fn draw_tile(out: &mut DisplayList, r: Rect, shape: TileShape, corner: u8, color: Color) {
    let paint = Paint::Solid(color);
    match shape {
        TileShape::Block => out.fill_rect(r, paint),
        TileShape::Zigzag => out.stroke_path(zigzag(r), LINE_WIDTH, paint),
        TileShape::Squiggle => out.stroke_path(squiggle(r), LINE_WIDTH, paint),
        TileShape::Triangle => {
            let [a, b, c, _] = corners_from(r, corner);
            out.fill_path(polygon([a, b, c]), paint);
        }
        TileShape::QuarterCircle => out.fill_path(quarter_circle(r, corner), paint),
        TileShape::Stripes => out.stroke_path(stripes(r), STRIPE_WIDTH, paint),
        TileShape::Dots => out.fill_path(dots(r), paint),
    }
}

/// Rectangle corners starting at `corner` (0 top-left, then clockwise); the last is opposite.
fn corners_from(r: Rect, corner: u8) -> [Point; 4] {
    let c = [
        Point::new(r.x0, r.y0),
        Point::new(r.x1, r.y0),
        Point::new(r.x1, r.y1),
        Point::new(r.x0, r.y1),
    ];
    let k = usize::from(corner % 4);
    [c[k], c[(k + 1) % 4], c[(k + 3) % 4], c[(k + 2) % 4]]
}

fn zigzag(r: Rect) -> BezPath {
    let mut path = BezPath::new();
    let mut y = r.y0 + ZIGZAG_JAG;
    while y + ZIGZAG_JAG <= r.y1 {
        let mut x = r.x0;
        let mut up = true;
        let mut row = Vec::new();
        while x <= r.x1 {
            row.push(Point::new(x, if up { y - ZIGZAG_JAG } else { y + ZIGZAG_JAG }));
            up = !up;
            x += ZIGZAG_STEP;
        }
        path.extend(polyline(row).elements().iter().copied());
        y += ZIGZAG_ROW;
    }
    path
}

fn squiggle(r: Rect) -> BezPath {
    let mut path = BezPath::new();
    let horizontal = r.width() >= r.height();
    let (along0, along1, across0, across1) = if horizontal {
        (r.x0, r.x1, r.y0, r.y1)
    } else {
        (r.y0, r.y1, r.x0, r.x1)
    };
    let mut c = across0 + SQUIGGLE_SPACING / 2.0;
    while c + SQUIGGLE_AMP <= across1 && c - SQUIGGLE_AMP >= across0 {
        let mut line = Vec::new();
        let mut s = along0;
        while s <= along1 {
            let off = (s * SQUIGGLE_FREQ).sin() * SQUIGGLE_AMP;
            line.push(if horizontal {
                Point::new(s, c + off)
            } else {
                Point::new(c + off, s)
            });
            s += 2.0;
        }
        path.extend(polyline(line).elements().iter().copied());
        c += SQUIGGLE_SPACING;
    }
    path
}

fn quarter_circle(r: Rect, corner: u8) -> BezPath {
    let [origin, ..] = corners_from(r, corner);
    let radius = r.width().min(r.height());
    // Clockwise corners each turn the fan by a quarter.
    let start = f64::from(corner % 4) * FRAC_PI_2;
    let arc = (0..=ARC_STEPS).map(|i| {
        let a = start + i as f64 / ARC_STEPS as f64 * FRAC_PI_2;
        Point::new(origin.x + a.cos() * radius, origin.y + a.sin() * radius)
    });
    polygon(std::iter::once(origin).chain(arc))
}

/// Diagonals `x + y = c` clipped to `r`.
fn stripes(r: Rect) -> BezPath {
    let mut path = BezPath::new();
    let mut c = r.x0 + r.y0 + STRIPE_SPACING;
    while c < r.x1 + r.y1 {
        let lo = r.x0.max(c - r.y1);
        let hi = r.x1.min(c - r.y0);
        if lo < hi {
            path.move_to((lo, c - lo));
            path.line_to((hi, c - hi));
        }
        c += STRIPE_SPACING;
    }
    path
}

fn dots(r: Rect) -> BezPath {
    let mut path = BezPath::new();
    let mut y = r.y0 + DOT_GAP / 2.0;
    while y + DOT_RADIUS <= r.y1 {
        let mut x = r.x0 + DOT_GAP / 2.0;
        while x + DOT_RADIUS <= r.x1 {
            path.extend(Circle::new((x, y), DOT_RADIUS).path_elements(PATH_TOLERANCE));
            x += DOT_GAP;
        }
        y += DOT_GAP;
    }
    path
}

#[cfg(test)]
#[path = "../../tests/unit/scene/tiles.rs"]
mod tests;
