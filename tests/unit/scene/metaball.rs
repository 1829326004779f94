use super::*;
use crate::rng::Seed;

fn world(density: Option<u32>) -> WorldDescription {
    let mut rng = SeedRng::from_seed(&Seed::new("panospace"));
    let config = SceneConfig {
        density,
        ..SceneConfig::default()
    };
    MetaballField.generate(&mut rng, &config).unwrap()
}

#[test]
fn blob_count_follows_budget() {
    assert_eq!(world(None).entities.len(), 8);
    assert_eq!(world(Some(30)).entities.len(), 30);
    assert_eq!(world(Some(10_000)).entities.len(), 64);
}

#[test]
fn lobes_and_sizes_are_in_range() {
    for e in &world(Some(64)).entities {
        let EntityKind::Blob { lobes } = &e.kind else {
            panic!("unexpected entity {:?}", e.kind);
        };
        assert!(lobes.iter().all(|l| (0.8..1.2).contains(l)));
        assert!((80.0..200.0).contains(&e.extent.x));
        assert!(e.motion.velocity.x.abs() <= DRIFT * WORLD_WIDTH);
    }
}

#[test]
fn drift_wraps_with_margin() {
    let w = world(Some(64));
    let b = w.bounds;
    for e in &w.entities {
        let reach = blob_reach(e);
        for t in [0.0, 10.0, 1_000.0, 123_456.0] {
            let c = blob_center(e, b, t);
            assert!(c.x >= b.x0 - reach - 1e-6);
            assert!(c.x < b.x1 + reach + 1e-6);
            assert!(c.y >= b.y0 - reach - 1e-6);
            assert!(c.y < b.y1 + reach + 1e-6);
        }
    }
}

fn on_screen(c: f64, reach: f64, lo: f64, hi: f64) -> f64 {
    ((c + reach).min(hi) - (c - reach).max(lo)).max(0.0)
}

#[test]
fn blobs_are_off_screen_when_they_wrap() {
    let w = world(Some(64));
    let b = w.bounds;
    let dt = 0.05;
    let mut wraps = 0;
    for e in &w.entities {
        let reach = blob_reach(e);
        assert!(reach >= e.extent.x * 1.25, "glow must fit inside the wrap margin");
        let tol_x = e.motion.velocity.x.abs() * dt + 1e-6;
        let tol_y = e.motion.velocity.y.abs() * dt + 1e-6;
        let mut prev = blob_center(e, b, 0.0);
        for step in 1..2_000 {
            let c = blob_center(e, b, step as f64 * dt);
            if (c.x - prev.x).abs() > b.width() / 2.0 {
                wraps += 1;
                assert!(on_screen(prev.x, reach, b.x0, b.x1) <= tol_x, "x before wrap {prev:?}");
                assert!(on_screen(c.x, reach, b.x0, b.x1) <= tol_x, "x after wrap {c:?}");
            }
            if (c.y - prev.y).abs() > b.height() / 2.0 {
                wraps += 1;
                assert!(on_screen(prev.y, reach, b.y0, b.y1) <= tol_y, "y before wrap {prev:?}");
                assert!(on_screen(c.y, reach, b.y0, b.y1) <= tol_y, "y after wrap {c:?}");
            }
            prev = c;
        }
    }
    assert!(wraps > 0);
}

#[test]
fn stationary_blob_stays_put() {
    let mut e = world(Some(1)).entities.remove(0);
    e.motion.velocity = Vec2::ZERO;
    let b = world_bounds();
    assert_eq!(blob_center(&e, b, 0.0), blob_center(&e, b, 500.0));
    assert_eq!(blob_center(&e, b, 0.0), e.position.xy());
}
