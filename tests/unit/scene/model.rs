use super::*;

fn sample() -> WorldDescription {
    let mut w = WorldDescription::new(SceneKind::Voxel, Rect::new(0.0, 0.0, 10.0, 10.0));
    w.entities.push(Entity::fixed(
        EntityKind::Voxel {
            block: BlockKind::Ground,
            height: 2,
        },
        Point3::new(1.0, 2.0, 0.0),
        Vec2::new(1.0, 2.0),
        7,
    ));
    w.entities.push(Entity::fixed(
        EntityKind::Voxel {
            block: BlockKind::Hero,
            height: 3,
        },
        Point3::new(1.0, 2.0, 2.0),
        Vec2::new(1.0, 3.0),
        8,
    ));
    w
}

#[test]
fn kind_parses_wire_names_and_rejects_unknown() {
    for k in SceneKind::ALL {
        assert_eq!(k.as_str().parse::<SceneKind>().unwrap(), k);
    }
    assert_eq!(
        "FRACTALFOREST".parse::<SceneKind>().unwrap(),
        SceneKind::FractalForest
    );
    let err = "galaxy".parse::<SceneKind>().unwrap_err();
    assert_eq!(err.to_string(), "unsupported scene kind: galaxy");
}

#[test]
fn kind_serde_matches_display() {
    let s = serde_json::to_string(&SceneKind::ParallaxWindow).unwrap();
    assert_eq!(s, "\"parallaxWindow\"");
}

#[test]
fn fingerprint_tracks_content() {
    let a = sample();
    let b = sample();
    assert_eq!(a.fingerprint(), b.fingerprint());

    let mut c = sample();
    c.entities[1].style_seed = 9;
    assert_ne!(a.fingerprint(), c.fingerprint());

    let mut d = sample();
    d.entities.swap(0, 1);
    assert_ne!(a.fingerprint(), d.fingerprint());
}

#[test]
fn summary_counts_labels() {
    let s = sample().summary();
    assert_eq!(s.entities, 2);
    assert_eq!(s.counts.get("voxel"), Some(&2));
    assert_eq!(s.fingerprint.len(), 32);
}

#[test]
fn world_round_trips_through_json() {
    let w = sample();
    let json = serde_json::to_string(&w).unwrap();
    let back: WorldDescription = serde_json::from_str(&json).unwrap();
    assert_eq!(back, w);
    assert_eq!(back.fingerprint(), w.fingerprint());
}
