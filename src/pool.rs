//! Bounded, recyclable per-frame entities (bubbles, spores, rain).
//!
//! Positions are normalised to the viewport (`0..1` on both axes) so a resize never touches pool
//! state. Storage is allocated once at creation; elements leaving the bounds are reset in place.

use crate::foundation::core::{Point, Vec2};
use crate::rng::{Random, SeedRng};

/// Static description of a pool.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSpec {
    /// Maximum live elements. Never grows.
    pub capacity: usize,
    /// Elements placed across the viewport at creation.
    pub initial: usize,
    /// New elements per second until `capacity` is reached.
    pub spawn_rate: f64,
    /// Horizontal velocity range, viewport widths per second.
    pub vx: (f64, f64),
    /// Vertical velocity range, viewport heights per second (positive falls).
    pub vy: (f64, f64),
    /// Size range in layout pixels.
    pub size: (f64, f64),
    /// Distance outside `0..1` an element travels before it is recycled.
    pub margin: f64,
}

impl Default for PoolSpec {
    fn default() -> Self {
        Self {
            capacity: 0,
            initial: 0,
            spawn_rate: 0.0,
            vx: (0.0, 0.0),
            vy: (0.05, 0.2),
            size: (1.0, 3.0),
            margin: 0.05,
        }
    }
}

/// One pooled element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoolItem {
    /// Normalised position.
    pub position: Point,
    /// Normalised velocity per second.
    pub velocity: Vec2,
    /// Size in layout pixels.
    pub size: f64,
    /// Oscillation phase in `[0, 2π)`.
    pub phase: f64,
    /// Seconds since the element was last spawned or recycled.
    pub age: f64,
}

impl PoolItem {
    /// Horizontal sway `sin(time * freq + phase) * amplitude` applied at draw time.
    pub fn sway(&self, time: f64, freq: f64, amplitude: f64) -> f64 {
        (time * freq + self.phase).sin() * amplitude
    }
}

/// Fixed-capacity pool of dynamic elements.
#[derive(Clone, Debug)]
pub struct EntityPool {
    spec: PoolSpec,
    items: Vec<PoolItem>,
    rng: SeedRng,
    spawn_debt: f64,
    recycled: u64,
}

impl EntityPool {
    /// Allocate storage for `spec.capacity` elements and place `spec.initial` of them.
    pub fn new(spec: PoolSpec, rng: SeedRng) -> Self {
        let mut pool = Self {
            spec,
            items: Vec::with_capacity(spec.capacity),
            rng,
            spawn_debt: 0.0,
            recycled: 0,
        };
        for _ in 0..spec.initial.min(spec.capacity) {
            let item = pool.spawn(true);
            pool.items.push(item);
        }
        pool
    }

    /// Pool with no elements.
    pub fn empty() -> Self {
        Self::new(PoolSpec::default(), SeedRng::from_u32(0))
    }

    /// Spec the pool was built from.
    pub fn spec(&self) -> &PoolSpec {
        &self.spec
    }

    /// Live elements.
    pub fn items(&self) -> &[PoolItem] {
        &self.items
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Return `true` when no element is live.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Fixed capacity.
    pub fn capacity(&self) -> usize {
        self.spec.capacity
    }

    /// Capacity of the backing allocation. Constant for the life of the pool.
    pub fn allocated_capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Total number of recycle events.
    pub fn recycled(&self) -> u64 {
        self.recycled
    }

    /// Advance every element by `dt` seconds, spawning lazily and recycling elements that
    /// leave the bounds. Non-finite or negative `dt` is treated as zero.
    pub fn advance(&mut self, dt: f64) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        if dt == 0.0 {
            return;
        }

        if self.items.len() < self.spec.capacity && self.spec.spawn_rate > 0.0 {
            self.spawn_debt += self.spec.spawn_rate * dt;
            while self.spawn_debt >= 1.0 && self.items.len() < self.spec.capacity {
                self.spawn_debt -= 1.0;
                let item = self.spawn(false);
                self.items.push(item);
            }
            if self.items.len() >= self.spec.capacity {
                self.spawn_debt = 0.0;
            }
        }

        let margin = self.spec.margin.max(0.0);
        let span = 1.0 + 2.0 * margin;
        for i in 0..self.items.len() {
            let mut item = self.items[i];
            item.position += item.velocity * dt;
            item.age += dt;

            let exited = item.position.y > 1.0 + margin || item.position.y < -margin;
            if exited {
                let falling = item.velocity.y >= 0.0;
                item = self.spawn(false);
                item.position.y = if falling { -margin } else { 1.0 + margin };
                self.recycled += 1;
            } else if item.position.x > 1.0 + margin || item.position.x < -margin {
                item.position.x = (item.position.x + margin).rem_euclid(span) - margin;
            }
            self.items[i] = item;
        }
    }

    /// Draw order: x, y, vx, vy, size, phase.
    fn spawn(&mut self, scatter: bool) -> PoolItem {
        let x = self.rng.next_f64();
        let ry = self.rng.next_f64();
        let vx = self.rng.range(self.spec.vx.0, self.spec.vx.1);
        let vy = self.rng.range(self.spec.vy.0, self.spec.vy.1);
        let size = self.rng.range(self.spec.size.0, self.spec.size.1);
        let phase = self.rng.next_f64() * std::f64::consts::TAU;
        let y = if scatter {
            ry
        } else if vy >= 0.0 {
            -self.spec.margin
        } else {
            1.0 + self.spec.margin
        };
        PoolItem {
            position: Point::new(x, y),
            velocity: Vec2::new(vx, vy),
            size,
            phase,
            age: 0.0,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/pool.rs"]
mod tests;
