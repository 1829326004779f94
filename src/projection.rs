//! World-to-surface transforms.
//!
//! All outputs are in layout pixels; the render backend applies the device pixel ratio.

use crate::foundation::core::{Point, Point3, Viewport};
use smallvec::SmallVec;

const NEAR_EPSILON: f64 = 1e-6;

/// Pinhole camera parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    /// Focal distance in world units. Larger values flatten the perspective.
    pub fov: f64,
    /// Screen origin as a fraction of the viewport (`(0.5, 0.5)` is the centre).
    pub anchor: Point,
    /// Layout pixels per world unit at depth `0`.
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: 400.0,
            anchor: Point::new(0.5, 0.5),
            zoom: 1.0,
        }
    }
}

impl Camera {
    /// Screen origin for `viewport`.
    pub fn origin(&self, viewport: &Viewport) -> Point {
        Point::new(
            self.anchor.x * viewport.width,
            self.anchor.y * viewport.height,
        )
    }
}

/// A projected point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    /// Surface position.
    pub point: Point,
    /// Perspective scale `fov / (fov + z)`, for sizing.
    pub scale: f64,
    /// Depth used for painter ordering (larger is further).
    pub depth: f64,
}

/// Perspective divide: `origin + xy * zoom * fov / (fov + z)`.
///
/// Returns `None` for points at or behind the camera plane.
pub fn project(p: Point3, viewport: &Viewport, camera: &Camera) -> Option<Projected> {
    let denom = camera.fov + p.z;
    if denom <= NEAR_EPSILON || !denom.is_finite() {
        return None;
    }
    let scale = camera.fov / denom;
    let origin = camera.origin(viewport);
    Some(Projected {
        point: Point::new(
            origin.x + p.x * camera.zoom * scale,
            origin.y + p.y * camera.zoom * scale,
        ),
        scale,
        depth: p.z,
    })
}

/// Isometric grid used by the voxel family.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsoGrid {
    /// Half tile width.
    pub tile_w: f64,
    /// Half tile height.
    pub tile_h: f64,
    /// Vertical lift per unit of `z`, in tile heights.
    pub lift: f64,
    /// Screen position of grid cell `(0, 0, 0)`.
    pub origin: Point,
}

impl IsoGrid {
    /// Screen position of grid coordinate `(x, y, z)`.
    pub fn to_screen(&self, x: f64, y: f64, z: f64) -> Point {
        Point::new(
            (x - y) * self.tile_w + self.origin.x,
            (x + y) * self.tile_h + self.origin.y - z * self.tile_h * self.lift,
        )
    }
}

/// Position on a tilted circular orbit. Returns the surface point and `sin(angle)`, which is
/// positive on the near half of the orbit.
pub fn orbit_point(center: Point, angle: f64, distance: f64, tilt: f64) -> (Point, f64) {
    let (s, c) = angle.sin_cos();
    (
        Point::new(center.x + c * distance, center.y + s * distance * tilt),
        s,
    )
}

/// Horizontal world wraparound for looping scroll scenes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldWrap {
    /// World length.
    pub length: f64,
    /// How far behind the camera an entity may sit before it wraps to the front.
    pub behind: f64,
}

impl WorldWrap {
    /// Offset of `x` relative to `camera_x`, mapped into `[-behind, length - behind)`.
    pub fn offset(&self, x: f64, camera_x: f64) -> f64 {
        if !is_positive(self.length) {
            return x - camera_x;
        }
        let o = (x - camera_x + self.behind).rem_euclid(self.length) - self.behind;
        // `rem_euclid` can round up to `length` for tiny negative inputs.
        if o >= self.length - self.behind {
            o - self.length
        } else {
            o
        }
    }

    /// Every offset at which an entity spanning `[x, x + extent)` overlaps the window
    /// `[lo, hi)`. An entity crossing the seam is reported at both copies so it never pops.
    pub fn visible_copies(
        &self,
        x: f64,
        extent: f64,
        camera_x: f64,
        lo: f64,
        hi: f64,
    ) -> SmallVec<[f64; 2]> {
        let mut out = SmallVec::new();
        if ![x, extent, camera_x, lo, hi].iter().all(|v| v.is_finite()) {
            return out;
        }
        if !is_positive(self.length) {
            let o = x - camera_x;
            if o + extent > lo && o < hi {
                out.push(o);
            }
            return out;
        }
        let base = self.offset(x, camera_x);
        // Walk back to the first copy that could still reach the window, then forwards.
        let mut o = base - ((base + extent - lo) / self.length).floor().max(0.0) * self.length;
        while o < hi {
            if o + extent > lo {
                out.push(o);
            }
            o += self.length;
        }
        out
    }
}

/// Scroll offset of a parallax layer at time `t`: `(base - t * speed)` wrapped into
/// `[0, length)`.
pub fn layer_offset(base: f64, t: f64, speed: f64, length: f64) -> f64 {
    if !is_positive(length) {
        return 0.0;
    }
    let v = (base - t * speed).rem_euclid(length);
    if v.is_finite() && v < length { v } else { 0.0 }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// A parallax layer: entities at one depth scroll together.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParallaxLayer {
    /// Starting offset.
    pub base: f64,
    /// World units per second.
    pub speed: f64,
}

impl ParallaxLayer {
    /// Offset at time `t` for a world of `length` units.
    pub fn offset(&self, t: f64, length: f64) -> f64 {
        layer_offset(self.base, t, self.speed, length)
    }
}

#[cfg(test)]
#[path = "../tests/unit/projection.rs"]
mod tests;
