use super::*;

fn vp() -> Viewport {
    Viewport::new(800.0, 400.0, 2.0)
}

#[test]
fn perspective_divide_matches_formula() {
    let cam = Camera {
        fov: 100.0,
        anchor: Point::new(0.5, 0.5),
        zoom: 2.0,
    };
    let p = project(Point3::new(10.0, -5.0, 100.0), &vp(), &cam).unwrap();
    assert_eq!(p.scale, 0.5);
    assert_eq!(p.point, Point::new(400.0 + 10.0, 200.0 - 5.0));
    assert_eq!(p.depth, 100.0);

    let at_origin = project(Point3::ZERO, &vp(), &cam).unwrap();
    assert_eq!(at_origin.point, Point::new(400.0, 200.0));
}

#[test]
fn points_behind_camera_are_culled() {
    let cam = Camera {
        fov: 100.0,
        ..Camera::default()
    };
    assert!(project(Point3::new(0.0, 0.0, -100.0), &vp(), &cam).is_none());
    assert!(project(Point3::new(0.0, 0.0, -150.0), &vp(), &cam).is_none());
    assert!(project(Point3::new(0.0, 0.0, -99.0), &vp(), &cam).is_some());
}

#[test]
fn isometric_lift() {
    let grid = IsoGrid {
        tile_w: 36.0,
        tile_h: 18.0,
        lift: 1.2,
        origin: Point::new(100.0, 50.0),
    };
    assert_eq!(grid.to_screen(0.0, 0.0, 0.0), Point::new(100.0, 50.0));
    let p = grid.to_screen(2.0, 1.0, 1.0);
    assert!((p.x - 136.0).abs() < 1e-9);
    assert!((p.y - (50.0 + 54.0 - 21.6)).abs() < 1e-9);
}

#[test]
fn orbit_depth_sign() {
    let (p, depth) = orbit_point(Point::new(0.0, 0.0), std::f64::consts::FRAC_PI_2, 10.0, 0.3);
    assert!(p.x.abs() < 1e-9);
    assert!((p.y - 3.0).abs() < 1e-9);
    assert!(depth > 0.0);
}

#[test]
fn wrap_offset_stays_in_window() {
    let wrap = WorldWrap {
        length: 2400.0,
        behind: 800.0,
    };
    for cam in [0.0, 1.0, 799.0, 2399.5, 10_000.0, -3.0] {
        for x in [0.0, 500.0, 1900.0, 2399.0] {
            let o = wrap.offset(x, cam);
            assert!((-800.0..1600.0).contains(&o), "x={x} cam={cam} o={o}");
            let delta = (o - (x - cam)) / 2400.0;
            assert!((delta - delta.round()).abs() < 1e-9);
        }
    }
}

#[test]
fn entity_crossing_seam_is_drawn_at_both_copies() {
    let wrap = WorldWrap {
        length: 100.0,
        behind: 0.0,
    };
    // Entity at x = 95 with extent 10 spans the seam of a 100-unit world viewed in full.
    let copies = wrap.visible_copies(95.0, 10.0, 0.0, 0.0, 100.0);
    assert_eq!(copies.as_slice(), &[-5.0, 95.0]);

    let inside = wrap.visible_copies(40.0, 10.0, 0.0, 0.0, 100.0);
    assert_eq!(inside.as_slice(), &[40.0]);

    let outside = wrap.visible_copies(40.0, 10.0, 0.0, 60.0, 90.0);
    assert!(outside.is_empty());
}

#[test]
fn parallax_offsets_wrap_into_world() {
    assert_eq!(layer_offset(100.0, 0.0, 10.0, 2400.0), 100.0);
    assert_eq!(layer_offset(100.0, 20.0, 10.0, 2400.0), 2300.0);
    assert_eq!(layer_offset(0.0, 240.0, 10.0, 2400.0), 0.0);
    assert_eq!(layer_offset(5.0, 1.0, 1.0, 0.0), 0.0);
    for t in 0..1000 {
        let v = layer_offset(37.0, t as f64 * 0.37, 55.5, 2400.0);
        assert!((0.0..2400.0).contains(&v));
    }
    let fast = ParallaxLayer {
        base: 0.0,
        speed: 2.0,
    };
    let slow = ParallaxLayer {
        base: 0.0,
        speed: 1.0,
    };
    assert_ne!(fast.offset(3.0, 2400.0), slow.offset(3.0, 2400.0));
}

#[test]
fn non_finite_windows_have_no_copies() {
    let wrap = WorldWrap {
        length: 100.0,
        behind: 0.0,
    };
    assert!(wrap.visible_copies(10.0, 5.0, 0.0, 0.0, f64::INFINITY).is_empty());
    assert!(wrap.visible_copies(10.0, 5.0, 0.0, f64::NEG_INFINITY, 50.0).is_empty());
    assert!(wrap.visible_copies(10.0, f64::INFINITY, 0.0, 0.0, 50.0).is_empty());
    assert!(wrap.visible_copies(f64::NAN, 5.0, 0.0, 0.0, 50.0).is_empty());
    assert_eq!(wrap.visible_copies(10.0, 5.0, 0.0, 0.0, 50.0).as_slice(), &[10.0]);
}
