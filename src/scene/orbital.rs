use crate::foundation::core::{Point, Point3, Vec2, Viewport};
use crate::foundation::error::SceneResult;
use crate::layout::budget::Budget;
use crate::layout::scatter::{ScatterParams, ScatterPattern, scatter};
use crate::layout::sphere::{fibonacci_sphere, golden_disc};
use crate::projection::{Camera, orbit_point, project};
use crate::render::display_list::{DisplayList, PATH_TOLERANCE, Paint, stops};
use crate::rng::{Random, SeedRng};
use crate::scene::config::SceneConfig;
use crate::scene::model::{Entity, EntityKind, SceneKind, WorldDescription};
use crate::scene::registry::{FrameCtx, SceneRecipe, WORLD_HEIGHT, WORLD_WIDTH, world_bounds};
use crate::theme::color::Color;
use crate::theme::palette::brand;
use kurbo::Shape;
use std::f64::consts::{FRAC_PI_4, TAU};

/// Core sphere points.
pub const BUDGET: Budget = Budget::new(800, 2000);

const STARS: usize = 150;
const PLANETS_PER_SYSTEM: u8 = 9;
const SYSTEM_X: [f64; 2] = [0.15, 0.85];
const TILT: f64 = 0.3;
// Angular speed of the source animation: 0.001 rad-units per frame at 60 fps.
const SPIN_SCALE: f64 = 0.06;

const SUN_GLOW: f64 = 50.0;
const SUN_CORE: f64 = 10.0;

const CORE_RADIUS: f64 = 130.0;
const CORE_SPIN: f64 = 0.15;
const CORE_TILT: f64 = 0.35;
const BACK_CULL: f64 = -0.8;

/// Twin tilted planetary systems around a rotating Fibonacci core.
#[derive(Clone, Copy, Debug, Default)]
pub struct Orbital;

impl SceneRecipe for Orbital {
    fn kind(&self) -> SceneKind {
        SceneKind::Orbital
    }

    fn budget(&self) -> Budget {
        BUDGET
    }

    fn generate(&self, rng: &mut SeedRng, config: &SceneConfig) -> SceneResult<WorldDescription> {
        let bounds = world_bounds();
        let mut world = WorldDescription::new(SceneKind::Orbital, bounds);

        let stars = scatter(
            rng,
            bounds,
            &ScatterParams {
                pattern: ScatterPattern::Uniform,
                count: STARS,
                depth: (0.2, 1.0),
                size: (0.0, 1.5),
                ..ScatterParams::default()
            },
        );
        for (i, s) in stars.iter().enumerate() {
            world.entities.push(
                Entity::fixed(
                    EntityKind::Star,
                    s.position,
                    Vec2::new(s.size, s.size),
                    i as u32,
                )
                .with_motion(Vec2::ZERO, s.phase),
            );
        }

        for (system, fx) in SYSTEM_X.iter().enumerate() {
            let center = Point3::new(fx * WORLD_WIDTH, WORLD_HEIGHT * 0.5, 0.0);
            world.entities.push(Entity::fixed(
                EntityKind::Sun,
                center,
                Vec2::new(SUN_CORE, SUN_CORE),
                system as u32,
            ));
            for index in 0..PLANETS_PER_SYSTEM {
                let i = f64::from(index);
                let distance = 40.0 + i * 18.0;
                let size = 3.0 + rng.next_f64() * 10.0;
                let direction = if index % 2 == 0 { 1.0 } else { -1.0 };
                let speed = (0.5 + rng.next_f64() * 0.5) * direction * (100.0 / (40.0 + i * 22.0));
                let angle = rng.next_f64() * TAU;
                world.entities.push(
                    Entity::fixed(
                        EntityKind::Planet {
                            system: system as u8,
                            index,
                            distance,
                            spin: speed * SPIN_SCALE,
                        },
                        center,
                        Vec2::new(size, size),
                        ((system as u32) << 8) | u32::from(index),
                    )
                    .with_motion(Vec2::ZERO, angle),
                );
            }
        }

        let n = BUDGET.resolve(config.density, "orbital sphere points");
        for (i, p) in fibonacci_sphere(n).into_iter().enumerate() {
            world.entities.push(Entity::fixed(
                EntityKind::SpherePoint,
                p,
                Vec2::ZERO,
                i as u32,
            ));
        }
        Ok(world)
    }

    fn draw(&self, out: &mut DisplayList, frame: &FrameCtx<'_>) {
        out.clear(Color::BLACK);
        let t = frame.time;

        for e in &frame.world.entities {
            if e.kind != EntityKind::Star {
                continue;
            }
            let twinkle = if frame.motion {
                0.75 + 0.25 * (t * 1.5 + e.motion.phase).sin()
            } else {
                1.0
            };
            out.fill_circle(
                e.position.xy(),
                e.extent.x,
                Paint::Solid(Color::WHITE.fade(e.position.z * twinkle)),
            );
        }

        draw_core(out, frame);
        for system in 0..SYSTEM_X.len() as u8 {
            draw_system(out, frame, system);
        }

        let c = frame.world.bounds.center();
        out.fill_rect(
            frame.world.bounds,
            Paint::Radial {
                center: c,
                radius: c.to_vec2().hypot(),
                stops: stops([
                    (0.0, Color::TRANSPARENT),
                    (0.7, Color::BLACK.fade(0.5)),
                    (1.0, Color::BLACK),
                ]),
            },
        );
    }
}

struct PlanetPose {
    point: Point,
    angle: f64,
    depth: f64,
    distance: f64,
    size: f64,
    spin: f64,
    index: u8,
}

fn draw_system(out: &mut DisplayList, frame: &FrameCtx<'_>, system: u8) {
    let t = frame.time;
    let Some(sun) = frame
        .world
        .entities
        .iter()
        .find(|e| e.kind == EntityKind::Sun && e.style_seed == u32::from(system))
    else {
        return;
    };
    let center = sun.position.xy();

    let mut poses: Vec<PlanetPose> = frame
        .world
        .entities
        .iter()
        .filter_map(|e| match e.kind {
            EntityKind::Planet {
                system: s,
                index,
                distance,
                spin,
            } if s == system => {
                let angle = e.motion.phase + t * spin;
                let (point, depth) = orbit_point(center, angle, distance, TILT);
                Some(PlanetPose {
                    point,
                    angle,
                    depth,
                    distance,
                    size: e.extent.x,
                    spin,
                    index,
                })
            }
            _ => None,
        })
        .collect();

    for p in &poses {
        out.stroke_ellipse(
            center,
            p.distance,
            p.distance * TILT,
            1.5,
            frame.theme.accent(usize::from(p.index)).fade(0.08),
        );
    }

    poses.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    for p in poses.iter().filter(|p| p.depth < 0.0) {
        draw_planet(out, frame, p);
    }

    out.fill_circle(
        center,
        SUN_GLOW,
        Paint::Radial {
            center,
            radius: SUN_GLOW,
            stops: stops([
                (0.16, Color::WHITE.fade(0.5)),
                (0.4, Color::WHITE.fade(0.1)),
                (1.0, Color::TRANSPARENT),
            ]),
        },
    );
    let pulse = if frame.motion { (t * 18.0).sin() * 0.5 + 1.0 } else { 1.0 };
    out.fill_circle(
        center,
        SUN_CORE + 15.0 + pulse * 5.0,
        Paint::glow(center, SUN_CORE + 15.0 + pulse * 5.0, Color::WHITE.fade(0.6)),
    );
    out.fill_circle(center, SUN_CORE, Paint::Solid(Color::WHITE));
    for (i, (dx, dy)) in golden_disc(21).into_iter().enumerate() {
        let flicker = 0.15 + 0.15 * (t * 3.0 + i as f64).sin().abs();
        out.fill_circle(
            center + Vec2::new(dx, dy) * (SUN_CORE * 1.8),
            0.8,
            Paint::Solid(Color::WHITE.fade(flicker)),
        );
    }

    for p in poses.iter().filter(|p| p.depth >= 0.0) {
        draw_planet(out, frame, p);
    }
}

fn draw_planet(out: &mut DisplayList, frame: &FrameCtx<'_>, p: &PlanetPose) {
    let scale = 1.0 + p.depth * 0.2;
    let radius = (p.size * scale).max(0.1);
    let color = frame.theme.accent(usize::from(p.index));
    let (s, c) = p.angle.sin_cos();
    let highlight = Point::new(
        p.point.x - c * p.size * 0.6,
        p.point.y - s * p.size * 0.6 * TILT,
    );
    out.fill_circle(
        p.point,
        radius,
        Paint::Radial {
            center: highlight,
            radius: radius * 1.6,
            stops: stops([(0.0, Color::WHITE), (0.2, color), (1.0, Color::BLACK)]),
        },
    );
    if p.size > 5.0 {
        let moon = frame.time * p.spin * 4.0;
        let (ms, mc) = moon.sin_cos();
        let m = Point::new(
            p.point.x + mc * p.size * 2.5,
            p.point.y + ms * p.size * 2.5 * TILT,
        );
        out.fill_circle(m, 1.5 * scale, Paint::Solid(Color::WHITE));
    }
}

struct Dot {
    point: Point,
    depth: f64,
    size: f64,
    color: Color,
}

fn draw_core(out: &mut DisplayList, frame: &FrameCtx<'_>) {
    // The camera origin is the frame centre, so projected points land around it.
    let center = frame.world.bounds.center();
    let spin = if frame.motion { frame.time * CORE_SPIN } else { 0.0 };
    let viewport = Viewport::new(WORLD_WIDTH, WORLD_HEIGHT, 1.0);
    let camera = Camera::default();

    out.fill_circle(
        center,
        CORE_RADIUS * 1.4,
        Paint::Radial {
            center,
            radius: CORE_RADIUS * 1.4,
            stops: stops([
                (0.0, brand::BLUE.fade(0.25)),
                (0.2, brand::MINT.fade(0.1)),
                (0.5, Color::TRANSPARENT),
            ]),
        },
    );

    let mut dots: Vec<Dot> = Vec::new();
    for e in &frame.world.entities {
        if e.kind != EntityKind::SpherePoint {
            continue;
        }
        let v = e.position.rotate_y(spin).rotate_x(CORE_TILT);
        let facing = -v.z;
        if facing < BACK_CULL {
            continue;
        }
        let Some(proj) = project(v.scale(CORE_RADIUS), &viewport, &camera) else {
            continue;
        };
        let base = if facing > 0.5 {
            frame.theme.roles.accent
        } else if e.style_seed % 2 == 0 {
            brand::BLUE
        } else {
            brand::PINK
        };
        dots.push(Dot {
            point: proj.point,
            depth: proj.depth,
            size: (1.5 + (facing + 1.0) * 2.0) * proj.scale * 0.5,
            color: base.fade((0.2 + (facing + 1.0) * 0.4).min(1.0)),
        });
    }
    dots.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    for d in dots {
        out.fill_circle(d.point, d.size, Paint::Solid(d.color));
    }

    let ring_turn = if frame.motion { frame.time * 0.05 } else { 0.0 };
    for (i, tilt) in [FRAC_PI_4, -FRAC_PI_4, 0.0].into_iter().enumerate() {
        let rx = CORE_RADIUS * (1.2 + i as f64 * 0.08);
        let ring = kurbo::Ellipse::new(center, (rx, rx * 0.2), tilt + ring_turn);
        out.stroke_path(
            ring.to_path(PATH_TOLERANCE),
            1.0,
            Paint::Solid(frame.theme.accent(i).fade(0.35)),
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/orbital.rs"]
mod tests;
