use super::*;
use crate::rng::Seed;
use crate::scene::registry::record_for_test;
use std::collections::BTreeSet;

fn world(seed: &str, density: Option<u32>) -> WorldDescription {
    let mut rng = SeedRng::from_seed(&Seed::new(seed));
    let config = SceneConfig {
        density,
        ..SceneConfig::default()
    };
    FractalForest.generate(&mut rng, &config).unwrap()
}

#[test]
fn entities_are_sorted_back_to_front() {
    let w = world("panospace", Some(200));
    assert!(!w.entities.is_empty());
    for pair in w.entities.windows(2) {
        assert!(pair[0].position.z <= pair[1].position.z);
    }
    for e in &w.entities {
        assert!(e.position.y >= WORLD_HEIGHT * HORIZON - 1e-9);
        assert!(e.position.y <= WORLD_HEIGHT);
    }
}

#[test]
fn requested_density_is_capped() {
    let w = world("panospace", Some(10_000));
    assert_eq!(w.entities.len(), BUDGET.cap as usize);
    assert!(w.count(|k| matches!(k, EntityKind::Tree { .. })) <= 75);
}

#[test]
fn every_slot_becomes_an_entity() {
    for i in 0..30 {
        let seed = format!("slot-{i}");
        for density in [1, 60, 137, 400] {
            let w = world(&seed, Some(density));
            assert_eq!(w.entities.len(), density as usize, "seed {seed}");
        }
    }
}

#[test]
fn unbloomed_plants_become_grass() {
    let mut grass = 0;
    for i in 0..20 {
        let w = world(&format!("meadow-{i}"), Some(400));
        for e in &w.entities {
            if let EntityKind::Grass { blades } = e.kind {
                grass += 1;
                assert!((GRASS_BLADES.0..GRASS_BLADES.0 + GRASS_BLADES.1 as u8).contains(&blades));
            }
        }
    }
    assert!(grass > 0);
}

#[test]
fn ground_grid_recedes_through_the_projector() {
    let b = world_bounds();
    let view = ground_view(b);
    let horizon = b.y0 + b.height() * HORIZON;
    let near = project(Point3::new(b.x1 - b.center().x, b.y1 - horizon, 0.0), &view, &GROUND)
        .unwrap();
    assert!((near.point.x - b.x1).abs() < 1e-9);
    assert!((near.point.y - b.y1).abs() < 1e-9);
    let far = project(
        Point3::new(b.x1 - b.center().x, b.y1 - horizon, GRID_DEPTH),
        &view,
        &GROUND,
    )
    .unwrap();
    assert!(far.scale < 0.05);
    assert!(far.point.y > horizon && far.point.y - horizon < 10.0);
    assert!((far.point.x - b.center().x).abs() < b.width() * 0.05);
}

#[test]
fn trees_respect_the_depth_bands() {
    let w = world("forest-depths", Some(150));
    for e in &w.entities {
        if let EntityKind::Tree { growth } = &e.kind {
            assert!(growth.max_depth() <= 4, "depth {}", growth.max_depth());
            assert!(!growth.segments.is_empty());
            assert!(!growth.leaves.is_empty());
        }
    }
}

#[test]
fn rolls_vary_across_seeds() {
    let mut skies = BTreeSet::new();
    for i in 0..40 {
        if let WorldStyle::Forest { sky, .. } = world(&format!("seed-{i}"), Some(1)).style {
            skies.insert(format!("{sky:?}"));
        }
    }
    assert!(skies.len() >= 2, "{skies:?}");
}

#[test]
fn entity_geometry_is_reproducible() {
    let a = world("panospace", None);
    let b = world("panospace", None);
    assert_eq!(a, b);
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn colour_override_changes_only_the_frame() {
    let plain = SceneConfig::default();
    let tinted = SceneConfig {
        color_override: Some(Color::hex(0x123456)),
        ..SceneConfig::default()
    };
    let (g1, a) = record_for_test(SceneKind::FractalForest, "panospace", &plain, 0.0, false);
    let (g2, b) = record_for_test(SceneKind::FractalForest, "panospace", &tinted, 0.0, false);
    assert_eq!(g1.world, g2.world);
    assert_ne!(a, b);
}
