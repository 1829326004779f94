use crate::foundation::core::{Point, Point3, Rect, Vec2, Viewport};
use crate::foundation::error::SceneResult;
use crate::layout::budget::{Budget, clamp_count};
use crate::layout::lsystem::{BranchParams, Leaf, Segment, Tree, grow};
use crate::pool::PoolSpec;
use crate::projection::{Camera, project};
use crate::render::display_list::{DisplayList, PATH_TOLERANCE, Paint, polyline, stops};
use crate::rng::{Random, SeedRng};
use crate::scene::config::SceneConfig;
use crate::scene::model::{
    Entity, EntityKind, GroundStyle, SceneKind, SkyStyle, WorldDescription, WorldStyle,
};
use crate::scene::registry::{FrameCtx, SceneRecipe, WORLD_HEIGHT, WORLD_WIDTH, world_bounds};
use crate::theme::color::Color;
use crate::theme::palette::brand;
use kurbo::Shape;
use rand_core::RngCore;
use std::f64::consts::TAU;

/// Trees plus plants. Without a requested density the count is rolled from the seed.
pub const BUDGET: Budget = Budget::new(60, 400);

const HORIZON: f64 = 0.7;
const PLANT_SLOTS: f64 = 110.0;
const DEPTH_CURVE: f64 = 1.6;
const BUSH_CHANCE: f64 = 0.65;
const FLOWER_GATE: f64 = 0.35;
const FLOWER_PETALS: u8 = 5;
const GRASS_BLADES: (u8, usize) = (2, 3);

/// Ground camera: the vanishing point sits on the horizon, one world unit per pixel up close.
const GROUND: Camera = Camera {
    fov: 1.0,
    anchor: Point::new(0.5, HORIZON),
    zoom: 1.0,
};
/// Depth of the far end of the ground grid.
const GRID_DEPTH: f64 = 21.0;
const GRID_LINES: u32 = 24;

const SPORES: PoolSpec = PoolSpec {
    capacity: 40,
    initial: 20,
    spawn_rate: 6.0,
    vx: (-0.015, 0.015),
    vy: (-0.05, -0.015),
    size: (0.6, 1.8),
    margin: 0.05,
};

/// Seed-driven forest on a perspective ground plane.
#[derive(Clone, Copy, Debug, Default)]
pub struct FractalForest;

/// Biome rolls drawn right after the theme.
#[derive(Clone, Copy, Debug)]
struct Rolls {
    primary: Color,
    secondary: Color,
    tree_count: usize,
    flower_chance: f64,
    flower_roll: f64,
    plant_density: f64,
    sky: SkyStyle,
    ground: GroundStyle,
}

impl Rolls {
    /// Seven draws: primary, secondary, trees, flowers, plants, sky, ground.
    fn draw(rng: &mut SeedRng) -> Self {
        let primary = brand::ACCENTS[rng.below(brand::ACCENTS.len())];
        let secondary = brand::ACCENTS[rng.below(brand::ACCENTS.len())];
        let tree_roll = rng.next_f64();
        let flower_roll = rng.next_f64();
        let plant_roll = rng.next_f64();
        let sky_roll = rng.next_f64();
        let ground_roll = rng.next_f64();

        let tree_count = if tree_roll < 0.05 {
            0
        } else {
            (25.0 + tree_roll * 50.0).floor() as usize
        };
        let flower_chance = if flower_roll < 0.25 {
            0.0
        } else if flower_roll < 0.85 {
            0.04
        } else {
            0.25
        };
        let plant_density = if plant_roll < 0.15 { 0.0 } else { plant_roll };
        let sky = if sky_roll < 0.45 {
            SkyStyle::Sunset
        } else if sky_roll < 0.75 {
            SkyStyle::Digital
        } else {
            SkyStyle::Monochrome
        };
        let ground = if ground_roll < 0.8 {
            GroundStyle::Dark
        } else if ground_roll < 0.9 {
            GroundStyle::Tinted
        } else {
            GroundStyle::Gradient
        };
        Self {
            primary,
            secondary,
            tree_count,
            flower_chance,
            flower_roll,
            plant_density,
            sky,
            ground,
        }
    }
}

impl SceneRecipe for FractalForest {
    fn kind(&self) -> SceneKind {
        SceneKind::FractalForest
    }

    fn budget(&self) -> Budget {
        BUDGET
    }

    fn generate(&self, rng: &mut SeedRng, config: &SceneConfig) -> SceneResult<WorldDescription> {
        let rolls = Rolls::draw(rng);
        let rolled = rolls.tree_count + (PLANT_SLOTS * rolls.plant_density).floor() as usize;
        let total = match config.density {
            Some(_) => BUDGET.resolve(config.density, "forest entities"),
            None => clamp_count(rolled, BUDGET.cap as usize, "forest entities"),
        };

        let horizon = WORLD_HEIGHT * HORIZON;
        let mut world = WorldDescription::new(SceneKind::FractalForest, world_bounds());
        world.style = WorldStyle::Forest {
            sky: rolls.sky,
            ground: rolls.ground,
            primary: rolls.primary,
            secondary: rolls.secondary,
        };

        // Placement draws come first for every slot, then each entity grows from its own stream.
        let mut slots = Vec::with_capacity(total);
        for i in 0..total {
            let dist = rng.next_f64().powf(DEPTH_CURVE);
            let x = rng.next_f64() * WORLD_WIDTH;
            let y = horizon + dist * (WORLD_HEIGHT - horizon);
            let slot = if i < rolls.tree_count {
                Slot::Tree
            } else if rng.next_f64() > BUSH_CHANCE {
                Slot::Bush
            } else {
                Slot::Plant
            };
            let style_seed = rng.next_u32();
            slots.push((Point3::new(x, y, dist), slot, style_seed));
        }
        slots.sort_by(|a, b| a.0.z.total_cmp(&b.0.z));

        for (pos, slot, style_seed) in slots {
            let mut erng = SeedRng::from_u32(style_seed);
            let dist = pos.z;
            let root = pos.xy();
            let entity = match slot {
                Slot::Tree => {
                    let height = 20.0 + dist * 130.0;
                    let depth = if dist < 0.2 {
                        3
                    } else if dist < 0.6 {
                        4
                    } else {
                        5
                    };
                    let growth = grow(
                        &mut erng,
                        root,
                        &BranchParams {
                            depth,
                            length: height,
                            width: (1.5 + dist * 5.0) * (height / 80.0),
                            ..BranchParams::default()
                        },
                    );
                    Entity::fixed(
                        EntityKind::Tree { growth },
                        pos,
                        Vec2::new(height * 0.6, height),
                        style_seed,
                    )
                }
                Slot::Bush => {
                    let size = 10.0 + dist * 35.0;
                    let growth = bush(&mut erng, root, size, dist);
                    Entity::fixed(
                        EntityKind::Bush { growth },
                        pos,
                        Vec2::new(size, size),
                        style_seed,
                    )
                }
                Slot::Plant => {
                    let size = 1.2 + dist * 2.2;
                    let bloom = rolls.flower_roll > FLOWER_GATE
                        && erng.next_f64() < rolls.flower_chance * 2.0;
                    let kind = if bloom {
                        EntityKind::Flower {
                            petals: FLOWER_PETALS,
                            hue: erng.below(brand::ACCENTS.len()) as u8,
                        }
                    } else {
                        EntityKind::Grass {
                            blades: GRASS_BLADES.0 + erng.below(GRASS_BLADES.1) as u8,
                        }
                    };
                    Entity::fixed(kind, pos, Vec2::new(size, size), style_seed)
                }
            };
            world.entities.push(entity);
        }
        Ok(world)
    }

    fn pool_spec(&self) -> Option<PoolSpec> {
        Some(SPORES)
    }

    fn draw(&self, out: &mut DisplayList, frame: &FrameCtx<'_>) {
        let WorldStyle::Forest {
            sky,
            ground,
            primary,
            secondary,
        } = frame.world.style
        else {
            return;
        };
        let primary = frame.config.color_override.unwrap_or(primary);
        let b = frame.world.bounds;
        let horizon = b.y0 + b.height() * HORIZON;

        out.clear(Color::hex(0x010101));
        let sky_stops = match sky {
            SkyStyle::Sunset => stops([
                (0.0, Color::hex(0x020202)),
                (0.5, secondary.fade(0.3)),
                (0.85, primary.fade(0.6)),
                (1.0, primary),
            ]),
            SkyStyle::Digital => stops([(0.0, Color::BLACK), (1.0, primary.fade(0.3))]),
            SkyStyle::Monochrome => stops([(0.0, Color::hex(0x010101)), (1.0, primary.fade(0.15))]),
        };
        out.fill_rect(
            Rect::new(b.x0, b.y0, b.x1, horizon),
            Paint::Linear {
                start: Point::new(0.0, b.y0),
                end: Point::new(0.0, horizon),
                stops: sky_stops,
            },
        );
        let ground_paint = match ground {
            GroundStyle::Dark => Paint::Solid(Color::hex(0x050505)),
            GroundStyle::Tinted => Paint::Solid(primary.fade(0.15)),
            GroundStyle::Gradient => {
                Paint::vertical(horizon, b.y1, primary.fade(0.2), Color::hex(0x020202))
            }
        };
        out.fill_rect(Rect::new(b.x0, horizon, b.x1, b.y1), ground_paint);

        let view = ground_view(b);
        let step = b.width() / f64::from(GRID_LINES);
        let half = b.width() / 2.0;
        let below = b.y1 - horizon;
        for i in 0..=GRID_LINES {
            let x = f64::from(i) * step - half;
            let ends = [0.0, GRID_DEPTH]
                .map(|z| project(Point3::new(x, below, z), &view, &GROUND))
                .map(|p| p.map(|p| p.point + b.origin().to_vec2()));
            let [Some(near), Some(far)] = ends else {
                continue;
            };
            out.stroke_path(
                polyline([far, near]),
                1.0,
                Paint::Solid(Color::WHITE.fade(0.02)),
            );
        }

        let breeze = frame.tune("forest.breeze", 1.5);
        for e in &frame.world.entities {
            let dist = e.position.z;
            let color = primary.fade(0.25 + dist * 0.75);
            let sway = if frame.motion {
                (frame.time * 0.8 + f64::from(e.style_seed % 628) / 100.0).sin() * dist * breeze
            } else {
                0.0
            };
            match &e.kind {
                EntityKind::Tree { growth } => draw_growth(out, growth, color, sway),
                EntityKind::Bush { growth } => draw_growth(out, growth, color, sway * 0.5),
                EntityKind::Flower { petals, hue } => {
                    let s = e.extent.x;
                    let base = e.position.xy();
                    let head = Point::new(base.x, base.y - s);
                    let petal = brand::ACCENTS[usize::from(*hue) % brand::ACCENTS.len()];
                    for i in 0..*petals {
                        let a = f64::from(i) * TAU / f64::from(*petals);
                        let c = head + Vec2::new(a.cos() * s, a.sin() * s);
                        let ellipse = kurbo::Ellipse::new(c, (s, s * 0.5), a);
                        out.fill_path(ellipse.to_path(PATH_TOLERANCE), Paint::Solid(petal));
                    }
                    out.fill_circle(head, s * 0.4, Paint::Solid(Color::WHITE));
                    out.stroke_line(base, head, 0.5, color);
                }
                EntityKind::Grass { blades } => {
                    let s = e.extent.y * 2.0;
                    let base = e.position.xy();
                    let n = f64::from(*blades);
                    for i in 0..*blades {
                        let lean = (f64::from(i) + 0.5) / n - 0.5 + sway * 0.1;
                        let tip = base + Vec2::new(lean * s, -s);
                        out.stroke_line(base, tip, 0.5, color);
                    }
                }
                _ => {}
            }
        }

        for item in frame.pool {
            let p = frame.pool_point(item);
            let p = Point::new(p.x + item.sway(frame.time, 0.9, 8.0), p.y);
            out.fill_circle(p, item.size, Paint::Solid(primary.fade(0.35)));
        }

        let c = b.center();
        out.fill_rect(
            b,
            Paint::Radial {
                center: c,
                radius: (c - b.origin()).hypot(),
                stops: stops([(0.45, Color::TRANSPARENT), (1.0, Color::BLACK.fade(0.65))]),
            },
        );
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Tree,
    Bush,
    Plant,
}

fn ground_view(bounds: Rect) -> Viewport {
    Viewport::new(bounds.width(), bounds.height(), 1.0)
}

/// Fan of straight stems with leaves strung along each one.
fn bush(rng: &mut SeedRng, root: Point, size: f64, dist: f64) -> Tree {
    let mut tree = Tree::default();
    let stems = 5 + (rng.next_f64() * 5.0).floor() as usize;
    for _ in 0..stems {
        let heading = rng.centered() * 140f64.to_radians();
        let len = size * (0.4 + rng.next_f64() * 0.6);
        let (s, c) = heading.sin_cos();
        let along = |dx: f64, dy: f64| root + Vec2::new(dx * c - dy * s, dx * s + dy * c);
        tree.segments.push(Segment {
            start: root,
            end: along(0.0, -len),
            width: 1.0 + dist,
            depth: 0,
        });
        let leaves = 3 + (rng.next_f64() * 3.0).floor() as usize;
        for j in 0..leaves {
            let dx = rng.centered() * 4.0;
            tree.leaves.push(Leaf {
                center: along(dx, -len * (j as f64 / leaves as f64)),
                radius: 1.2 + dist,
            });
        }
    }
    tree
}

fn draw_growth(out: &mut DisplayList, growth: &Tree, color: Color, sway: f64) {
    for s in &growth.segments {
        out.stroke_line(s.start, s.end, s.width, color);
    }
    for leaf in &growth.leaves {
        let c = Point::new(leaf.center.x + sway, leaf.center.y);
        out.fill_ellipse(c, leaf.radius, leaf.radius * 0.6, Paint::Solid(color));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/forest.rs"]
mod tests;
