use super::*;

#[test]
fn pixel_size_scales_by_device_ratio_and_rounds_up() {
    let v = Viewport::new(100.5, 40.0, 2.0);
    assert_eq!(v.pixel_size().unwrap(), (201, 80));

    let v = Viewport::new(10.2, 10.2, 1.0);
    assert_eq!(v.pixel_size().unwrap(), (11, 11));
}

#[test]
fn zero_sized_viewport_is_unavailable() {
    let err = Viewport::empty().pixel_size().unwrap_err();
    assert!(matches!(err, SceneError::SurfaceUnavailable(_)));
    assert!(!Viewport::new(0.0, 50.0, 1.0).is_drawable());
}

#[test]
fn oversized_viewport_is_unavailable() {
    let v = Viewport::new(40_000.0, 10.0, 2.0);
    assert!(v.pixel_size().is_err());
}

#[test]
fn bad_device_ratio_falls_back_to_one() {
    assert_eq!(Viewport::new(1.0, 1.0, f64::NAN).device_pixel_ratio, 1.0);
    assert_eq!(Viewport::new(1.0, 1.0, -3.0).device_pixel_ratio, 1.0);
}

#[test]
fn rotations_preserve_length() {
    let p = Point3::new(0.3, -0.4, 0.5);
    let len = p.length();
    assert!((p.rotate_y(1.234).length() - len).abs() < 1e-12);
    assert!((p.rotate_x(-0.77).length() - len).abs() < 1e-12);
}

#[test]
fn premultiply_rounds_half_up() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c, Rgba8Premul { r: 128, g: 64, b: 0, a: 128 });
}
