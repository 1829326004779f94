use crate::foundation::core::{Point3, Rect, Vec2};
use crate::layout::budget::clamp_count;
use crate::rng::Random;
use std::f64::consts::TAU;

/// Largest particle count [`scatter`] will produce.
pub const MAX_SCATTER: usize = 10_000;

/// Spatial arrangement of scattered particles.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScatterPattern {
    /// Uniform over the bounds.
    Uniform,
    /// One particle per grid cell (row-major, wrapping), offset by up to `jitter` of a cell.
    Grid {
        /// Columns.
        cols: u32,
        /// Rows.
        rows: u32,
        /// Fraction of a cell, `0..=1`.
        jitter: f64,
    },
    /// Evenly spaced rings around the centre of the bounds.
    Concentric {
        /// Ring count.
        rings: u32,
        /// Radial jitter as a fraction of ring spacing.
        jitter: f64,
    },
}

/// Parameters for [`scatter`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterParams {
    /// Arrangement.
    pub pattern: ScatterPattern,
    /// Requested particle count, clamped to [`MAX_SCATTER`].
    pub count: usize,
    /// Depth range `[min, max)`.
    pub depth: (f64, f64),
    /// Size range `[min, max)`.
    pub size: (f64, f64),
    /// Horizontal velocity range.
    pub vx: (f64, f64),
    /// Vertical velocity range.
    pub vy: (f64, f64),
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            pattern: ScatterPattern::Uniform,
            count: 0,
            depth: (0.0, 1.0),
            size: (1.0, 3.0),
            vx: (0.0, 0.0),
            vy: (0.0, 0.0),
        }
    }
}

/// Scattered entity with independent motion.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Particle {
    /// Position; `z` is depth.
    pub position: Point3,
    /// Velocity in bounds units per second.
    pub velocity: Vec2,
    /// Size.
    pub size: f64,
    /// Oscillation phase in `[0, 2π)`.
    pub phase: f64,
}

/// Scatter particles over `bounds`.
///
/// Each particle consumes exactly seven draws, in the order x, y, z, size, vx, vy, phase, so the
/// pattern never changes how far the stream advances.
pub fn scatter(rng: &mut impl Random, bounds: Rect, params: &ScatterParams) -> Vec<Particle> {
    let n = clamp_count(params.count, MAX_SCATTER, "scatter particles");
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let rx = rng.next_f64();
        let ry = rng.next_f64();
        let (x, y) = place(params.pattern, bounds, i, n, rx, ry);
        let z = rng.range(params.depth.0, params.depth.1);
        let size = rng.range(params.size.0, params.size.1);
        let vx = rng.range(params.vx.0, params.vx.1);
        let vy = rng.range(params.vy.0, params.vy.1);
        let phase = rng.next_f64() * TAU;
        out.push(Particle {
            position: Point3::new(x, y, z),
            velocity: Vec2::new(vx, vy),
            size,
            phase,
        });
    }
    out
}

fn place(
    pattern: ScatterPattern,
    bounds: Rect,
    i: usize,
    n: usize,
    rx: f64,
    ry: f64,
) -> (f64, f64) {
    match pattern {
        ScatterPattern::Uniform => (
            bounds.x0 + rx * bounds.width(),
            bounds.y0 + ry * bounds.height(),
        ),
        ScatterPattern::Grid { cols, rows, jitter } => {
            let cols = cols.max(1) as usize;
            let rows = rows.max(1) as usize;
            let cell = i % (cols * rows);
            let (col, row) = (cell % cols, cell / cols);
            let cw = bounds.width() / cols as f64;
            let ch = bounds.height() / rows as f64;
            let j = jitter.clamp(0.0, 1.0);
            let fx = 0.5 + (rx - 0.5) * j;
            let fy = 0.5 + (ry - 0.5) * j;
            (
                bounds.x0 + (col as f64 + fx) * cw,
                bounds.y0 + (row as f64 + fy) * ch,
            )
        }
        ScatterPattern::Concentric { rings, jitter } => {
            let rings = rings.max(1) as usize;
            let ring = i % rings;
            let per_ring = n.div_ceil(rings).max(1);
            let slot = i / rings;
            let max_r = bounds.width().min(bounds.height()) * 0.5;
            let spacing = max_r / rings as f64;
            let radius =
                spacing * (ring as f64 + 1.0) + (ry - 0.5) * spacing * jitter.clamp(0.0, 1.0);
            let angle = TAU * (slot as f64 + rx) / per_ring as f64;
            let c = bounds.center();
            (c.x + angle.cos() * radius, c.y + angle.sin() * radius)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/scatter.rs"]
mod tests;
