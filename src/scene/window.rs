use crate::foundation::core::{Point, Point3, Rect, Vec2, Viewport};
use crate::foundation::error::SceneResult;
use crate::foundation::math::{lerp, smoothstep};
use crate::layout::budget::Budget;
use crate::layout::scatter::{ScatterParams, ScatterPattern, scatter};
use crate::pool::PoolSpec;
use crate::projection::{Camera, ParallaxLayer, WorldWrap, project};
use crate::render::display_list::{DisplayList, PATH_TOLERANCE, Paint, polygon, stops};
use crate::rng::{Random, SeedRng};
use crate::scene::config::SceneConfig;
use crate::scene::model::{BuildingStyle, Entity, EntityKind, SceneKind, WorldDescription};
use crate::scene::registry::{FrameCtx, SceneRecipe, WORLD_HEIGHT, WORLD_WIDTH, world_bounds};
use crate::theme::color::Color;
use kurbo::{BezPath, Shape};
use rand_core::RngCore;

/// Skyline buildings.
pub const BUDGET: Budget = Budget::new(150, 600);

/// Length of the looping route in world units.
pub const WORLD_LENGTH: f64 = 2400.0;

const TRACK_POSTS: usize = 40;
const TRACK_SPAN: f64 = 500.0;
const PYLONS: usize = 18;
const PYLON_START: f64 = 1900.0;
const PYLON_STEP: f64 = 35.0;
const DISTANT_LIGHTS: usize = 48;

const DOWNTOWN_START: f64 = 500.0;
const DOWNTOWN_SPAN: f64 = 1400.0;
const FAR_LAYER: f64 = 7.0;

/// World units per second at speed factor 1.
const CRAWL: f64 = 45.0;
/// `(section end, speed factor)` along the route.
const SECTIONS: [(f64, f64); 4] = [(400.0, 2.0), (1900.0, 2.8), (2300.0, 3.8), (2400.0, 1.0)];
const OUTSIDE: (f64, f64) = (450.0, 2350.0);

// Layout pixels per world unit at perspective 1, and the scale of the source 140px window.
const K: f64 = WORLD_HEIGHT / 140.0;
const UNIT: f64 = 1.4 * K;
const WRAP: WorldWrap = WorldWrap {
    length: WORLD_LENGTH,
    behind: 800.0,
};
/// Skyline camera: street level at the bottom edge, depth `z` scales by `3.8 / (z + 1)`.
const SKYLINE: Camera = Camera {
    fov: 1.0,
    anchor: Point::new(0.5, 1.0),
    zoom: 3.8,
};

const WARM: Color = Color::hex(0xFFD27F);
const COOL: Color = Color::hex(0xE0EFFF);
const CITY_BLOOM: Color = Color::hex(0xFFAD66);
const BRIDGE_BLOOM: Color = Color::hex(0xB0C4DE);

const RAIN: PoolSpec = PoolSpec {
    capacity: 120,
    initial: 60,
    spawn_rate: 30.0,
    vx: (-0.02, -0.005),
    vy: (0.4, 0.9),
    size: (2.0, 6.0),
    margin: 0.05,
};

/// A looping drive past a city skyline, seen through a cabin window.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParallaxWindow;

impl SceneRecipe for ParallaxWindow {
    fn kind(&self) -> SceneKind {
        SceneKind::ParallaxWindow
    }

    fn budget(&self) -> Budget {
        BUDGET
    }

    /// Track posts, then seven draws per building, then pylons and the distant light layer.
    fn generate(&self, rng: &mut SeedRng, config: &SceneConfig) -> SceneResult<WorldDescription> {
        let mut world = WorldDescription::new(SceneKind::ParallaxWindow, world_bounds());
        world.world_length = Some(WORLD_LENGTH);

        for i in 0..TRACK_POSTS {
            world.entities.push(Entity::fixed(
                EntityKind::TrackPost {
                    pillar: i % 4 == 0,
                    light: i % 10 == 0,
                },
                Point3::new(i as f64 / TRACK_POSTS as f64 * TRACK_SPAN, 0.0, 0.0),
                Vec2::new(35.0, 0.0),
                i as u32,
            ));
        }

        let n = BUDGET.resolve(config.density, "skyline buildings");
        for _ in 0..n {
            let z = 1.2 + rng.next_f64() * 14.0;
            let x = DOWNTOWN_START + rng.next_f64() * DOWNTOWN_SPAN;
            let w = (70.0 + rng.next_f64() * 140.0) / (z * 0.08 + 1.0);
            let h = 350.0 + rng.next_f64() * 1100.0;
            let style = BuildingStyle::ALL[rng.below(BuildingStyle::ALL.len())];
            let warm = rng.next_f64() > 0.6;
            let seed = rng.next_u32();
            world.entities.push(Entity::fixed(
                EntityKind::Building { style, warm },
                Point3::new(x, 0.0, z),
                Vec2::new(w, h),
                seed,
            ));
        }

        for i in 0..PYLONS {
            world.entities.push(Entity::fixed(
                EntityKind::Pylon { tower: i % 4 == 0 },
                Point3::new(PYLON_START + i as f64 * PYLON_STEP, 0.0, 0.0),
                Vec2::new(20.0, WORLD_HEIGHT),
                i as u32,
            ));
        }

        let lights = scatter(
            rng,
            Rect::new(0.0, WORLD_HEIGHT * 0.52, WORLD_LENGTH, WORLD_HEIGHT * 0.72),
            &ScatterParams {
                pattern: ScatterPattern::Uniform,
                count: DISTANT_LIGHTS,
                depth: (0.3, 1.0),
                size: (0.6, 1.8),
                ..ScatterParams::default()
            },
        );
        for (i, l) in lights.iter().enumerate() {
            world.entities.push(
                Entity::fixed(EntityKind::Star, l.position, Vec2::new(l.size, l.size), i as u32)
                    .with_motion(Vec2::ZERO, l.phase),
            );
        }
        Ok(world)
    }

    fn pool_spec(&self) -> Option<PoolSpec> {
        Some(RAIN)
    }

    fn draw(&self, out: &mut DisplayList, frame: &FrameCtx<'_>) {
        let b = frame.world.bounds;
        let t = if frame.motion { frame.time } else { 0.0 };
        let lx = (world_x(t) + frame.tune("window.start", 0.0)).rem_euclid(WORLD_LENGTH);
        let outside = is_outside(lx);

        out.clear(Color::BLACK);
        if outside {
            out.fill_rect(
                b,
                Paint::Linear {
                    start: Point::new(0.0, b.y0),
                    end: Point::new(0.0, b.y1),
                    stops: stops([
                        (0.0, Color::hex(0x02040d)),
                        (0.5, Color::hex(0x040818)),
                        (1.0, Color::hex(0x020205)),
                    ]),
                },
            );
            let glow_top = b.y0 + b.height() * 0.7;
            out.fill_rect(
                Rect::new(b.x0, glow_top, b.x1, b.y1),
                Paint::vertical(
                    glow_top,
                    b.y1,
                    Color::TRANSPARENT,
                    Color::rgb(255, 130, 0).fade(0.12),
                ),
            );
            draw_distant_lights(out, frame, t);
        }

        let buildings = || {
            frame
                .world
                .entities
                .iter()
                .filter(|e| matches!(e.kind, EntityKind::Building { .. }))
        };
        for e in buildings().filter(|e| e.position.z >= FAR_LAYER) {
            draw_building(out, e, lx, t);
        }
        if outside {
            for e in &frame.world.entities {
                if let EntityKind::Pylon { tower } = e.kind {
                    draw_pylon(out, e, tower, lx);
                }
            }
        }
        for e in buildings().filter(|e| e.position.z < FAR_LAYER) {
            draw_building(out, e, lx, t);
        }
        for e in &frame.world.entities {
            if let EntityKind::TrackPost { light, .. } = e.kind {
                draw_track(out, e, light, lx);
            }
        }

        for item in frame.pool {
            let p = frame.pool_point(item);
            let tail = Vec2::new(item.velocity.x * 40.0, -item.size * 4.0);
            out.stroke_line(p, p + tail, 1.0, Color::WHITE.fade(0.12));
        }

        draw_cabin(out, frame, lx);
    }
}

/// Position along the route at `time`, in `[0, WORLD_LENGTH)`.
///
/// Speed is constant within each section, so the position is a pure function of time.
pub fn world_x(time: f64) -> f64 {
    if !time.is_finite() || time <= 0.0 {
        return 0.0;
    }
    let mut t = time.rem_euclid(loop_seconds());
    let mut start = 0.0;
    for (end, speed) in SECTIONS {
        let v = speed * CRAWL;
        let dur = (end - start) / v;
        if t < dur {
            return start + t * v;
        }
        t -= dur;
        start = end;
    }
    0.0
}

/// Seconds for one lap of the route.
pub fn loop_seconds() -> f64 {
    let mut start = 0.0;
    let mut total = 0.0;
    for (end, speed) in SECTIONS {
        total += (end - start) / (speed * CRAWL);
        start = end;
    }
    total
}

/// `true` once the train has left the tunnel.
pub fn is_outside(lx: f64) -> bool {
    lx > OUTSIDE.0 && lx < OUTSIDE.1
}

fn skyline_view() -> Viewport {
    Viewport::new(WORLD_WIDTH, WORLD_HEIGHT, 1.0)
}

/// Pixels per skyline unit at depth `z`, or `None` behind the camera.
fn skyline_scale(z: f64) -> Option<f64> {
    project(Point3::new(0.0, 0.0, z), &skyline_view(), &SKYLINE).map(|p| p.scale * SKYLINE.zoom)
}

fn seed_fraction(seed: u32) -> f64 {
    f64::from(seed) / f64::from(u32::MAX)
}

fn draw_distant_lights(out: &mut DisplayList, frame: &FrameCtx<'_>, t: f64) {
    let speed = frame.tune("window.distantSpeed", 12.0);
    for e in &frame.world.entities {
        if e.kind != EntityKind::Star {
            continue;
        }
        let layer = ParallaxLayer {
            base: e.position.x,
            speed: speed * e.position.z,
        };
        let x = layer.offset(t, WORLD_LENGTH) * WORLD_WIDTH / WORLD_LENGTH;
        let color = if e.style_seed % 3 == 0 { WARM } else { COOL };
        out.fill_circle(
            Point::new(x, e.position.y),
            e.extent.x,
            Paint::Solid(color.fade(e.position.z * 0.4)),
        );
    }
}

fn draw_building(out: &mut DisplayList, e: &Entity, lx: f64, t: f64) {
    let EntityKind::Building { style, warm } = e.kind else {
        return;
    };
    let view = skyline_view();
    let z = e.position.z;
    let Some(persp) = skyline_scale(z) else {
        return;
    };
    let bw = e.extent.x * persp * K;
    let bh = e.extent.y * persp * K;
    let half = WORLD_WIDTH / 2.0 / (UNIT * persp);
    let body = if z > 8.0 {
        Color::hex(0x020308)
    } else {
        Color::hex(0x050712)
    };
    let seed = seed_fraction(e.style_seed);

    for ox in WRAP.visible_copies(e.position.x, e.extent.x / 1.4, lx, -half, half) {
        let Some(foot) = project(Point3::new(ox * UNIT, 0.0, z), &view, &SKYLINE) else {
            continue;
        };
        let (px, ground) = (foot.point.x, foot.point.y);
        let top = ground - bh;
        match style {
            BuildingStyle::Tapered => out.fill_path(
                polygon([
                    Point::new(px, ground),
                    Point::new(px + bw * 0.2, top),
                    Point::new(px + bw * 0.8, top),
                    Point::new(px + bw, ground),
                ]),
                Paint::Solid(body),
            ),
            _ => out.fill_rect(Rect::new(px, top, px + bw, ground), Paint::Solid(body)),
        }
        match style {
            BuildingStyle::Stepped => {
                out.fill_rect(
                    Rect::new(px + bw * 0.1, top - bh * 0.1, px + bw * 0.9, top),
                    Paint::Solid(body),
                );
                out.fill_rect(
                    Rect::new(px + bw * 0.25, top - bh * 0.2, px + bw * 0.75, top - bh * 0.1),
                    Paint::Solid(body),
                );
            }
            BuildingStyle::Ball => {
                out.fill_circle(Point::new(px + bw * 0.5, top), bw * 0.35, Paint::Solid(body));
            }
            BuildingStyle::Glass => out.fill_rect(
                Rect::new(px, top, px + bw, ground),
                Paint::Linear {
                    start: Point::new(px, top),
                    end: Point::new(px + bw, ground),
                    stops: stops([(0.0, Color::WHITE.fade(0.04)), (1.0, Color::TRANSPARENT)]),
                },
            ),
            BuildingStyle::Tapered | BuildingStyle::Flat => {}
        }

        let rows = ((bh / (10.0 * K)).floor() as usize).min(25);
        let cols = ((bw / (8.0 * K)).floor() as usize).min(8);
        let lit = if warm { WARM } else { COOL };
        for i in 0..rows {
            let fi = i as f64;
            if (seed * 100.0 + fi).sin() <= 0.1 {
                continue;
            }
            let alpha = ((0.05 + (t * 0.4 + fi + seed).sin() * 0.04) * persp).clamp(0.0, 1.0);
            let y = top + fi * (bh / rows as f64) + 5.0 * K;
            let mut row = BezPath::new();
            for j in (0..cols).filter(|j| (j + i) % 3 != 0) {
                let x = px + j as f64 * (bw / cols as f64) + 3.0 * K;
                let pane = Rect::new(x, y, x + 1.2 * persp * K, y + 1.8 * persp * K);
                row.extend(pane.path_elements(PATH_TOLERANCE));
            }
            if !row.elements().is_empty() {
                out.fill_path(row, Paint::Solid(lit.fade(alpha)));
            }
        }

        let blink = (((t * 5.0 + seed).sin() + 1.0) * 0.5 * persp).min(1.0);
        let beacon = Point::new(px + bw / 2.0, top - 3.0 * K);
        out.fill_rect(
            Rect::from_origin_size(beacon, (2.0 * K, 2.0 * K)),
            Paint::Solid(Color::hex(0xFF0033).fade(blink)),
        );
    }
}

fn draw_pylon(out: &mut DisplayList, e: &Entity, tower: bool, lx: f64) {
    let reach = 20.0 * K / UNIT;
    for ox in WRAP.visible_copies(e.position.x - reach, reach * 2.0, lx, 0.0, WORLD_WIDTH / UNIT) {
        let px = (ox + reach) * UNIT;
        out.fill_rect(
            Rect::new(px - 10.0 * K, 0.0, px + 10.0 * K, WORLD_HEIGHT),
            Paint::Solid(Color::hex(0x0a0a0a)),
        );
        if tower {
            let cap = Rect::new(px - 20.0 * K, 0.0, px + 20.0 * K, WORLD_HEIGHT * 0.3);
            out.fill_rect(cap, Paint::Solid(Color::hex(0x111111)));
            out.stroke_path(cap.to_path(PATH_TOLERANCE), 1.0, Paint::Solid(Color::hex(0x1a1a1a)));
        }
    }
}

fn draw_track(out: &mut DisplayList, e: &Entity, light: bool, lx: f64) {
    let h = WORLD_HEIGHT;
    let reach = 100.0 * K / UNIT;
    for ox in WRAP.visible_copies(e.position.x - reach, reach * 2.0, lx, 0.0, WORLD_WIDTH / UNIT) {
        let px = (ox + reach) * UNIT;
        out.fill_rect(
            Rect::new(px, h * 0.82, px + e.extent.x * K, h),
            Paint::Solid(Color::hex(0x050505)),
        );
        out.fill_rect(
            Rect::new(px - 100.0 * K, h * 0.8, px + 100.0 * K, h * 0.8 + 3.0 * K),
            Paint::Solid(Color::hex(0x111111)),
        );
        if light {
            let flare = Point::new(px, h * 0.78);
            out.fill_rect(
                Rect::new(px - 30.0 * K, h * 0.5, px + 30.0 * K, h),
                Paint::Radial {
                    center: flare,
                    radius: 30.0 * K,
                    stops: stops([
                        (0.0, Color::rgb(255, 220, 150).fade(0.08)),
                        (1.0, Color::TRANSPARENT),
                    ]),
                },
            );
            out.fill_rect(
                Rect::new(px - K, h * 0.75, px + K, h * 0.75 + 6.0 * K),
                Paint::Solid(CITY_BLOOM),
            );
        }
    }
}

/// Bloom colour and strength for the current section, blended across section edges.
fn cabin_bloom(accent: Color, lx: f64) -> (Color, f64) {
    let city = smoothstep(450.0, 550.0, lx) * (1.0 - smoothstep(1850.0, 1950.0, lx));
    let bridge = smoothstep(1850.0, 1950.0, lx);
    let color = accent.mix(CITY_BLOOM, city).mix(BRIDGE_BLOOM, bridge);
    (color, lerp(0.12, 0.2, city.max(bridge)))
}

fn draw_cabin(out: &mut DisplayList, frame: &FrameCtx<'_>, lx: f64) {
    let b = frame.world.bounds;
    let inset = 6.0 * K;
    let pane = kurbo::RoundedRect::from_rect(b.inset(-inset), 26.0 * K);
    let pane_path = pane.to_path(PATH_TOLERANCE);

    let sweep = (lx * 0.9 * K).rem_euclid(b.width());
    out.fill_path(
        pane_path.clone(),
        Paint::Linear {
            start: Point::new(sweep, b.y0),
            end: Point::new(sweep + 130.0 * K, b.y1),
            stops: stops([
                (0.0, Color::WHITE.fade(0.05)),
                (0.5, Color::TRANSPARENT),
                (1.0, Color::WHITE.fade(0.01)),
            ]),
        },
    );

    let (bloom, strength) = cabin_bloom(frame.theme.roles.accent, lx);
    let c = Point::new(b.center().x, b.y0 + b.height() * 1.3);
    out.fill_rect(
        b,
        Paint::Radial {
            center: c,
            radius: b.width() * 0.8,
            stops: stops([(0.0, bloom.fade(strength)), (1.0, Color::TRANSPARENT)]),
        },
    );

    out.stroke_path(
        pane_path,
        18.0 * K,
        Paint::Linear {
            start: Point::new(b.x0, 0.0),
            end: Point::new(b.x1, 0.0),
            stops: stops([
                (0.0, Color::hex(0x0a0a0a)),
                (0.5, Color::hex(0x252525)),
                (1.0, Color::hex(0x0a0a0a)),
            ]),
        },
    );
}

#[cfg(test)]
#[path = "../../tests/unit/scene/window.rs"]
mod tests;
