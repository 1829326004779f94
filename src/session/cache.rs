use crate::rng::Seed;
use crate::scene::config::SceneConfig;
use crate::scene::model::SceneKind;
use crate::scene::registry::Generated;
use std::collections::{HashMap, VecDeque};

/// Default number of worlds kept.
pub const DEFAULT_WORLD_CACHE: usize = 32;

/// Cache key: everything generation depends on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WorldKey {
    /// Normalised seed text.
    pub seed: String,
    /// Scene kind.
    pub kind: SceneKind,
    /// Hash of the generation-relevant config subset.
    pub config_hash: u64,
}

impl WorldKey {
    /// Key for a generation request.
    pub fn new(seed: &Seed, kind: SceneKind, config: &SceneConfig) -> Self {
        Self {
            seed: seed.as_str().to_owned(),
            kind,
            config_hash: config.generation_hash(),
        }
    }
}

/// Hit/miss counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that missed.
    pub misses: u64,
    /// Entries dropped to stay within capacity.
    pub evictions: u64,
}

/// Least-recently-used cache of generated worlds. Capacity `0` disables caching.
#[derive(Debug)]
pub struct WorldCache {
    capacity: usize,
    entries: HashMap<WorldKey, Generated>,
    lru: VecDeque<WorldKey>,
    stats: CacheStats,
}

impl Default for WorldCache {
    fn default() -> Self {
        Self::new(DEFAULT_WORLD_CACHE)
    }
}

impl WorldCache {
    /// Cache holding at most `capacity` worlds.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            lru: VecDeque::new(),
            stats: CacheStats::default(),
        }
    }

    /// Maximum entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counters since creation.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Cached world for `key`, marking it most recently used.
    pub fn get(&mut self, key: &WorldKey) -> Option<Generated> {
        match self.entries.get(key).cloned() {
            Some(g) => {
                self.stats.hits += 1;
                self.touch(key);
                Some(g)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Store `generated` under `key`, evicting the least recently used entry when full.
    pub fn insert(&mut self, key: WorldKey, generated: Generated) {
        if self.capacity == 0 {
            return;
        }
        self.entries.insert(key.clone(), generated);
        self.touch(&key);
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                self.entries.remove(&old);
                self.stats.evictions += 1;
            }
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    fn touch(&mut self, key: &WorldKey) {
        if let Some(pos) = self.lru.iter().position(|k| k == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key.clone());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/cache.rs"]
mod tests;
