use super::*;
use crate::rng::SeedRng;
use crate::scene::model::WorldDescription;
use crate::scene::registry::world_bounds;
use crate::theme::palette::derive_theme;
use std::sync::Arc;

fn generated(pool_seed: u32) -> Generated {
    Generated {
        world: Arc::new(WorldDescription::new(SceneKind::TiledPattern, world_bounds())),
        theme: Arc::new(derive_theme(&mut SeedRng::from_u32(pool_seed))),
        pool_seed,
    }
}

fn key(seed: &str) -> WorldKey {
    WorldKey::new(&Seed::new(seed), SceneKind::TiledPattern, &SceneConfig::default())
}

#[test]
fn evicts_least_recently_used() {
    let mut cache = WorldCache::new(2);
    cache.insert(key("a"), generated(1));
    cache.insert(key("b"), generated(2));
    assert!(cache.get(&key("a")).is_some());
    cache.insert(key("c"), generated(3));

    assert_eq!(cache.len(), 2);
    assert!(cache.get(&key("b")).is_none());
    assert_eq!(cache.get(&key("a")).map(|g| g.pool_seed), Some(1));
    assert_eq!(cache.get(&key("c")).map(|g| g.pool_seed), Some(3));
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn zero_capacity_disables() {
    let mut cache = WorldCache::new(0);
    cache.insert(key("a"), generated(1));
    assert!(cache.is_empty());
    assert!(cache.get(&key("a")).is_none());
    assert_eq!(cache.stats().misses, 1);
}

#[test]
fn key_ignores_cosmetic_config() {
    let cosmetic = SceneConfig {
        speed: Some(3.0),
        animations_enabled: false,
        ..SceneConfig::default()
    };
    let dense = SceneConfig {
        density: Some(4),
        ..SceneConfig::default()
    };
    let seed = Seed::new("a");
    let base = WorldKey::new(&seed, SceneKind::Voxel, &SceneConfig::default());
    assert_eq!(base, WorldKey::new(&seed, SceneKind::Voxel, &cosmetic));
    assert_ne!(base, WorldKey::new(&seed, SceneKind::Voxel, &dense));
    assert_ne!(base, WorldKey::new(&seed, SceneKind::Orbital, &SceneConfig::default()));
}

#[test]
fn reinsert_refreshes_entry() {
    let mut cache = WorldCache::new(2);
    cache.insert(key("a"), generated(1));
    cache.insert(key("b"), generated(2));
    cache.insert(key("a"), generated(9));
    cache.insert(key("c"), generated(3));
    assert_eq!(cache.get(&key("a")).map(|g| g.pool_seed), Some(9));
    assert!(cache.get(&key("b")).is_none());
}
