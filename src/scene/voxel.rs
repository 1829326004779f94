use crate::foundation::core::{Point, Point3, Rect, Vec2};
use crate::foundation::error::SceneResult;
use crate::foundation::math::clamp01;
use crate::layout::budget::Budget;
use crate::pool::PoolSpec;
use crate::projection::IsoGrid;
use crate::render::display_list::{DisplayList, Paint, polygon};
use crate::rng::{Random, SeedRng};
use crate::scene::config::SceneConfig;
use crate::scene::model::{BlockKind, Entity, EntityKind, SceneKind, WorldDescription};
use crate::scene::registry::{FrameCtx, SceneRecipe, WORLD_WIDTH, world_bounds};
use crate::theme::color::Color;
use crate::theme::palette::ThemeRoles;

/// Island grid side.
pub const BUDGET: Budget = Budget::new(10, 24);

const MIN_SIDE: usize = 4;
const HERO_HEIGHT: u32 = 3;
const PROP_CHANCE: f64 = 0.85;
const EDGE_FALLOFF: f64 = 1.2;

// Geometry at the default side of 10; larger islands shrink tiles to keep the footprint.
const TILE_W: f64 = 36.0;
const TILE_H: f64 = 18.0;
const BLOCK_H: f64 = 14.0;
const LIFT: f64 = 1.2;
const ISLAND_CENTER_Y: f64 = 230.0;

const BUILD_SECONDS: f64 = 1.0;
const BUILD_STAGGER: f64 = 0.05;
const DROP: f64 = 300.0;

const MOTES: PoolSpec = PoolSpec {
    capacity: 24,
    initial: 12,
    spawn_rate: 4.0,
    vx: (-0.01, 0.01),
    vy: (-0.12, -0.04),
    size: (1.0, 2.5),
    margin: 0.05,
};

/// Isometric voxel island with one hero pillar.
#[derive(Clone, Copy, Debug, Default)]
pub struct VoxelIsland;

impl SceneRecipe for VoxelIsland {
    fn kind(&self) -> SceneKind {
        SceneKind::Voxel
    }

    fn budget(&self) -> Budget {
        BUDGET
    }

    fn generate(&self, rng: &mut SeedRng, config: &SceneConfig) -> SceneResult<WorldDescription> {
        let side = BUDGET.resolve(config.density, "voxel grid side").max(MIN_SIDE);
        let mut world = WorldDescription::new(SceneKind::Voxel, world_bounds());
        world.entities = island(rng, side);
        Ok(world)
    }

    fn pool_spec(&self) -> Option<PoolSpec> {
        Some(MOTES)
    }

    fn draw(&self, out: &mut DisplayList, frame: &FrameCtx<'_>) {
        let roles = frame.theme.roles;
        let bounds = frame.world.bounds;
        out.fill_rect(
            bounds,
            Paint::vertical(bounds.y0, bounds.y1, roles.sky_top, roles.sky_bottom),
        );

        let side = island_side(frame.world);
        let grid = grid_for(side);
        let k = grid.tile_w / TILE_W;
        let progress = if frame.motion {
            clamp01(frame.time / BUILD_SECONDS)
        } else {
            1.0
        };

        for e in &frame.world.entities {
            let EntityKind::Voxel { block, height } = e.kind else {
                continue;
            };
            let (x, y) = (e.position.x, e.position.y);
            let built = clamp01(progress * 1.5 - (x + y) * BUILD_STAGGER);
            if built <= 0.0 {
                continue;
            }
            let drop = -DROP * (1.0 - built);
            let base = grid.to_screen(x, y, e.position.z) + Vec2::new(0.0, drop);
            let top_y = base.y - f64::from(height) * BLOCK_H * k;
            let (top, right, left) = face_colors(block, &frame.theme.roles);

            out.with_opacity(built as f32, |out| {
                draw_block(out, &grid, base, top_y, top, right, left);
                if block == BlockKind::Hero {
                    out.fill_rect(
                        Rect::new(base.x - 2.0, top_y - 40.0, base.x + 2.0, top_y),
                        Paint::vertical(top_y - 40.0, top_y, roles.glow.fade(0.0), roles.glow),
                    );
                }
            });

            // Sparse twinkles on top faces.
            let tick = (frame.time * 2.0).floor() as i64;
            if built >= 1.0 && block == BlockKind::Ground && (x as i64 * y as i64 + tick) % 7 == 0 {
                out.fill_circle(
                    Point::new(base.x, top_y),
                    1.5 * k.max(0.5),
                    Paint::Solid(Color::WHITE.fade(0.6)),
                );
            }
        }

        for item in frame.pool {
            let p = frame.pool_point(item);
            let p = Point::new(p.x + item.sway(frame.time, 1.3, 6.0), p.y);
            out.fill_circle(p, item.size, Paint::Solid(roles.glow.fade(0.5)));
        }
    }
}

/// Build the island columns in painter order.
///
/// Draw order per cell: base roll, x jitter, y jitter, then the prop roll for interior cells.
fn island(rng: &mut SeedRng, side: usize) -> Vec<Entity> {
    let center = side as f64 / 2.0;
    let max_dist = side as f64 / 2.0 - 0.5;
    let (hero_x, hero_y) = hero_cell(rng, side, center, max_dist);

    let mut blocks = Vec::with_capacity(side * side * 2);
    for x in 0..side {
        for y in 0..side {
            let (fx, fy) = (x as f64, y as f64);
            let dist = ((fx - center).powi(2) + (fy - center).powi(2)).sqrt();

            let mut h = (rng.next_f64() * 2.0).floor() as i64 + 1;
            h += (((fx + rng.next_f64() * 10.0) * 0.8).sin() * 1.5).floor() as i64;
            h += (((fy + rng.next_f64() * 10.0) * 0.8).cos() * 1.5).floor() as i64;
            if dist > max_dist {
                if dist > max_dist + EDGE_FALLOFF {
                    continue;
                }
                h -= 2;
            }
            let base = h.max(1) as u32;
            let seed = cell_seed(x, y);
            blocks.push(column(BlockKind::Ground, fx, fy, 0, base, seed));

            if x == hero_x && y == hero_y {
                blocks.push(column(BlockKind::Hero, fx, fy, base, HERO_HEIGHT, seed ^ 1));
            } else if dist < max_dist && rng.next_f64() > PROP_CHANCE {
                blocks.push(column(BlockKind::Prop, fx, fy, base, 1, seed ^ 2));
            }
        }
    }

    // Painter order: back diagonals first, lower blocks first within a diagonal.
    blocks.sort_by(|a, b| {
        let da = a.position.x + a.position.y;
        let db = b.position.x + b.position.y;
        da.total_cmp(&db)
            .then(a.position.z.total_cmp(&b.position.z))
    });
    blocks
}

/// Hero cell drawn from the interior, pulled toward the centre until it sits inside the disc.
fn hero_cell(rng: &mut SeedRng, side: usize, center: f64, max_dist: f64) -> (usize, usize) {
    let span = (side - MIN_SIDE) as f64;
    let mut x = (rng.next_f64() * span).floor() as usize + 2;
    let mut y = (rng.next_f64() * span).floor() as usize + 2;
    loop {
        let (dx, dy) = (x as f64 - center, y as f64 - center);
        if (dx * dx + dy * dy).sqrt() <= max_dist {
            return (x, y);
        }
        if dx.abs() >= dy.abs() {
            x = if dx > 0.0 { x - 1 } else { x + 1 };
        } else {
            y = if dy > 0.0 { y - 1 } else { y + 1 };
        }
    }
}

fn column(block: BlockKind, x: f64, y: f64, z: u32, height: u32, seed: u32) -> Entity {
    Entity::fixed(
        EntityKind::Voxel { block, height },
        Point3::new(x, y, f64::from(z)),
        Vec2::new(1.0, f64::from(height)),
        seed,
    )
}

fn cell_seed(x: usize, y: usize) -> u32 {
    (x as u32).wrapping_mul(73_856_093) ^ (y as u32).wrapping_mul(19_349_663)
}

fn island_side(world: &WorldDescription) -> usize {
    world
        .entities
        .iter()
        .map(|e| e.position.x.max(e.position.y) as usize + 1)
        .max()
        .unwrap_or(BUDGET.default as usize)
        .max(MIN_SIDE)
}

fn grid_for(side: usize) -> IsoGrid {
    let k = BUDGET.default as f64 / side as f64;
    let tile_h = TILE_H * k;
    IsoGrid {
        tile_w: TILE_W * k,
        tile_h,
        lift: LIFT,
        origin: Point::new(WORLD_WIDTH / 2.0, ISLAND_CENTER_Y - side as f64 * tile_h),
    }
}

fn face_colors(block: BlockKind, roles: &ThemeRoles) -> (Color, Color, Color) {
    match block {
        BlockKind::Ground => (
            roles.structure_base,
            roles.structure_side,
            roles.structure_side.shade(-20),
        ),
        BlockKind::Hero => (roles.glow.shade(40), roles.glow.shade(-20), roles.glow.shade(-40)),
        BlockKind::Prop => (
            roles.structure_side.shade(40),
            roles.structure_side.shade(-10),
            roles.structure_side.shade(-30),
        ),
    }
}

fn draw_block(
    out: &mut DisplayList,
    grid: &IsoGrid,
    base: Point,
    top_y: f64,
    top: Color,
    right: Color,
    left: Color,
) {
    let (tw, th) = (grid.tile_w, grid.tile_h);
    let x = base.x;
    out.fill_path(
        polygon([
            Point::new(x - tw, base.y),
            Point::new(x, base.y + th),
            Point::new(x, top_y + th),
            Point::new(x - tw, top_y),
        ]),
        Paint::Solid(left),
    );
    out.fill_path(
        polygon([
            Point::new(x + tw, base.y),
            Point::new(x, base.y + th),
            Point::new(x, top_y + th),
            Point::new(x + tw, top_y),
        ]),
        Paint::Solid(right),
    );
    let face = polygon([
        Point::new(x, top_y - th),
        Point::new(x + tw, top_y),
        Point::new(x, top_y + th),
        Point::new(x - tw, top_y),
    ]);
    out.fill_path(face.clone(), Paint::Solid(top));
    out.stroke_path(face, 1.0, Paint::Solid(Color::WHITE.fade(0.15)));
}

#[cfg(test)]
#[path = "../../tests/unit/scene/voxel.rs"]
mod tests;
