use crate::foundation::error::{SceneError, SceneResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Largest per-axis pixel size a surface may have (the raster backend addresses pixels with `u16`).
pub const MAX_SURFACE_PX: u32 = u16::MAX as u32;

/// Drawing-surface dimensions as observed by the host.
///
/// `width`/`height` are layout (CSS) pixels; the backing pixel buffer is
/// `ceil(width * device_pixel_ratio) x ceil(height * device_pixel_ratio)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Layout width.
    pub width: f64,
    /// Layout height.
    pub height: f64,
    /// Device pixel ratio (physical pixels per layout pixel).
    pub device_pixel_ratio: f64,
}

impl Viewport {
    /// Build a viewport. Non-finite or non-positive ratios fall back to `1.0`.
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        let device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// A zero-sized viewport, used before the host reports a size.
    pub fn empty() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    /// Return `true` when the viewport has a drawable, finite area.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 1.0 && self.height >= 1.0
    }

    /// Backing pixel-buffer size.
    pub fn pixel_size(&self) -> SceneResult<(u32, u32)> {
        if !self.is_drawable() {
            return Err(SceneError::surface_unavailable(format!(
                "viewport {}x{} has no drawable area",
                self.width, self.height
            )));
        }
        let w = (self.width * self.device_pixel_ratio).ceil();
        let h = (self.height * self.device_pixel_ratio).ceil();
        if w > f64::from(MAX_SURFACE_PX) || h > f64::from(MAX_SURFACE_PX) {
            return Err(SceneError::surface_unavailable(format!(
                "surface {w}x{h} exceeds {MAX_SURFACE_PX}px per axis"
            )));
        }
        Ok((w as u32, h as u32))
    }

    /// Layout-space rectangle `[0, width] x [0, height]`.
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width.max(0.0), self.height.max(0.0))
    }

    /// Layout-space centre.
    pub fn center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }

    /// Smaller of width and height.
    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

/// World-space point with depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point3 {
    /// Horizontal.
    pub x: f64,
    /// Vertical (screen-down positive).
    pub y: f64,
    /// Depth (away from the viewer positive).
    pub z: f64,
}

impl Point3 {
    /// Origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Build a point.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Lift a 2D point onto the `z` plane.
    pub fn from_2d(p: Point, z: f64) -> Self {
        Self::new(p.x, p.y, z)
    }

    /// Drop depth.
    pub fn xy(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Euclidean length from the origin.
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Uniform scale.
    pub fn scale(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }

    /// Component-wise add.
    pub fn offset(self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Rotate around the vertical axis by `angle` radians.
    pub fn rotate_y(self, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(self.x * c + self.z * s, self.y, -self.x * s + self.z * c)
    }

    /// Rotate around the horizontal axis by `angle` radians.
    pub fn rotate_x(self, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(self.x, self.y * c - self.z * s, self.y * s + self.z * c)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
