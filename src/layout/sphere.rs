use crate::foundation::core::Point3;
use crate::layout::budget::clamp_count;

/// `π(3 - √5)`, the angular step between consecutive points.
pub const GOLDEN_ANGLE: f64 = std::f64::consts::PI * (3.0 - 2.236_067_977_499_79);

/// Largest point count [`fibonacci_sphere`] will produce.
pub const MAX_SPHERE_POINTS: usize = 16_384;

/// Point `i` of an `n`-point Fibonacci sphere on the unit sphere.
///
/// `y` runs from `1` (index 0) to `-1` (index `n - 1`); a single point sits on the north pole.
pub fn fibonacci_point(i: usize, n: usize) -> Point3 {
    if n <= 1 {
        return Point3::new(0.0, 1.0, 0.0);
    }
    let y = 1.0 - 2.0 * (i as f64) / ((n - 1) as f64);
    let radius = (1.0 - y * y).max(0.0).sqrt();
    let theta = GOLDEN_ANGLE * i as f64;
    let (s, c) = theta.sin_cos();
    Point3::new(c * radius, y, s * radius)
}

/// Quasi-uniform distribution of `count` points, clamped to [`MAX_SPHERE_POINTS`].
pub fn fibonacci_sphere(count: usize) -> Vec<Point3> {
    let n = clamp_count(count, MAX_SPHERE_POINTS, "sphere points");
    (0..n).map(|i| fibonacci_point(i, n)).collect()
}

/// Sunflower layout of `count` points in the unit disc (same golden-angle step).
pub fn golden_disc(count: usize) -> Vec<(f64, f64)> {
    let n = clamp_count(count, MAX_SPHERE_POINTS, "disc points");
    (0..n)
        .map(|i| {
            let r = ((i as f64 + 0.5) / n as f64).sqrt();
            let (s, c) = (GOLDEN_ANGLE * i as f64).sin_cos();
            (c * r, s * r)
        })
        .collect()
}
