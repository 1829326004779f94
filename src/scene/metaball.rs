use crate::foundation::core::{Point, Point3, Rect, Vec2};
use crate::foundation::error::SceneResult;
use crate::layout::budget::Budget;
use crate::layout::scatter::{ScatterParams, ScatterPattern, scatter};
use crate::pool::PoolSpec;
use crate::projection::WorldWrap;
use crate::render::display_list::{DisplayList, Paint, smooth_closed, stops};
use crate::rng::{Random, SeedRng};
use crate::scene::config::SceneConfig;
use crate::scene::model::{Entity, EntityKind, SceneKind, WorldDescription};
use crate::scene::registry::{FrameCtx, SceneRecipe, WORLD_HEIGHT, WORLD_WIDTH, world_bounds};
use crate::theme::color::Color;
use crate::theme::palette::brand;
use std::f64::consts::TAU;

/// Blob count.
pub const BUDGET: Budget = Budget::new(8, 64);

const LOBES: usize = 12;
const DRIFT: f64 = 0.03;
const WOBBLE_RATE: f64 = 0.3;
const WOBBLE: f64 = 0.1;
/// Outline and glow stay within this multiple of a blob's radius; blobs wrap only once fully
/// past it.
const REACH: f64 = 1.2 + WOBBLE;
const GRID_STEP: f64 = 100.0;

const BUBBLES: PoolSpec = PoolSpec {
    capacity: 60,
    initial: 30,
    spawn_rate: 8.0,
    vx: (-0.005, 0.005),
    vy: (-0.08, -0.02),
    size: (1.0, 4.0),
    margin: 0.05,
};

/// Drifting deformable blobs with neon edges.
#[derive(Clone, Copy, Debug, Default)]
pub struct MetaballField;

impl SceneRecipe for MetaballField {
    fn kind(&self) -> SceneKind {
        SceneKind::MetaballField
    }

    fn budget(&self) -> Budget {
        BUDGET
    }

    /// Per blob: the seven scatter draws, then twelve lobe draws.
    fn generate(&self, rng: &mut SeedRng, config: &SceneConfig) -> SceneResult<WorldDescription> {
        let n = BUDGET.resolve(config.density, "metaball blobs");
        let mut world = WorldDescription::new(SceneKind::MetaballField, world_bounds());
        let unit = Rect::new(0.0, 0.0, 1.0, 1.0);
        let params = ScatterParams {
            pattern: ScatterPattern::Uniform,
            count: 1,
            depth: (0.0, 0.0),
            size: (80.0, 200.0),
            vx: (-DRIFT, DRIFT),
            vy: (-DRIFT, DRIFT),
        };
        for i in 0..n {
            let Some(p) = scatter(rng, unit, &params).pop() else {
                continue;
            };
            let mut lobes = [0.0; LOBES];
            for l in &mut lobes {
                *l = 0.8 + rng.next_f64() * 0.4;
            }
            world.entities.push(
                Entity::fixed(
                    EntityKind::Blob { lobes },
                    Point3::new(p.position.x * WORLD_WIDTH, p.position.y * WORLD_HEIGHT, 0.0),
                    Vec2::new(p.size, p.size),
                    i as u32,
                )
                .with_motion(
                    Vec2::new(p.velocity.x * WORLD_WIDTH, p.velocity.y * WORLD_HEIGHT),
                    p.phase,
                ),
            );
        }
        Ok(world)
    }

    fn pool_spec(&self) -> Option<PoolSpec> {
        Some(BUBBLES)
    }

    fn draw(&self, out: &mut DisplayList, frame: &FrameCtx<'_>) {
        let b = frame.world.bounds;
        out.clear(Color::hex(0x050508));
        let mut x = b.x0;
        while x < b.x1 {
            out.stroke_line(
                Point::new(x, b.y0),
                Point::new(x, b.y1),
                1.0,
                brand::MINT.fade(0.03),
            );
            x += GRID_STEP;
        }

        let wobble_t = frame.time * frame.tune("metaball.wobble", WOBBLE_RATE);
        let glow = frame.tune("metaball.glow", 1.25).clamp(0.0, REACH);
        for (i, e) in frame.world.entities.iter().enumerate() {
            let EntityKind::Blob { lobes } = &e.kind else {
                continue;
            };
            let center = blob_center(e, b, frame.time);
            let edge = frame.theme.accent(i);
            let points: Vec<Point> = lobes
                .iter()
                .enumerate()
                .map(|(j, lobe)| {
                    let angle = j as f64 / LOBES as f64 * TAU;
                    let wobble = (wobble_t + e.motion.phase + j as f64).sin() * WOBBLE;
                    let r = e.extent.x * (lobe + wobble);
                    center + Vec2::new(angle.cos() * r, angle.sin() * r)
                })
                .collect();

            out.fill_circle(
                center,
                e.extent.x * glow,
                Paint::glow(center, e.extent.x * glow, edge.fade(0.18)),
            );
            let outline = smooth_closed(&points);
            out.fill_path(outline.clone(), Paint::Solid(Color::hex(0x0a0a0a)));
            out.stroke_path(outline, 2.0, Paint::Solid(edge));
        }

        for item in frame.pool {
            let p = frame.pool_point(item);
            let p = Point::new(p.x + item.sway(frame.time, 1.1, 4.0), p.y);
            out.stroke_ellipse(p, item.size, item.size, 0.8, Color::WHITE.fade(0.15));
        }

        out.fill_rect(
            b,
            Paint::Linear {
                start: b.origin(),
                end: Point::new(b.x1, b.y1),
                stops: stops([
                    (0.0, Color::WHITE.fade(0.05)),
                    (0.5, Color::TRANSPARENT),
                    (1.0, Color::WHITE.fade(0.02)),
                ]),
            },
        );
    }
}

/// How far past its center a blob can paint.
pub fn blob_reach(e: &Entity) -> f64 {
    e.extent.x * REACH
}

/// Blob position at `time`: linear drift wrapped into the frame plus the blob's reach on each
/// side, so a blob is fully off-screen whenever it wraps.
pub fn blob_center(e: &Entity, bounds: Rect, time: f64) -> Point {
    let reach = blob_reach(e);
    let wrap_x = WorldWrap {
        length: bounds.width() + 2.0 * reach,
        behind: reach,
    };
    let wrap_y = WorldWrap {
        length: bounds.height() + 2.0 * reach,
        behind: reach,
    };
    let x = e.position.x + e.motion.velocity.x * time;
    let y = e.position.y + e.motion.velocity.y * time;
    Point::new(
        bounds.x0 + wrap_x.offset(x, bounds.x0),
        bounds.y0 + wrap_y.offset(y, bounds.y0),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/scene/metaball.rs"]
mod tests;
