//! Reproducible randomness for scene generation.
//!
//! Every scene instance derives all of its structure from one [`Seed`]. The pipeline is fixed and
//! portable so the same seed produces the same world in any implementation:
//!
//! 1. Hash the seed string over its UTF-16 code units:
//!    `h = 0xDEADBEEF; for c in units { h = (h ^ c) * 2654435761 }` (wrapping `u32`).
//! 2. Use `h` as the state of a mulberry32 stream:
//!    `a += 0x6D2B79F5; t = (a ^ a >> 15) * (a | 1); t ^= t + (t ^ t >> 7) * (t | 61);`
//!    `out = t ^ t >> 14`, and the float draw is `out / 2^32`.

use rand_core::RngCore;

/// Seed used whenever the caller supplies an empty seed.
pub const DEFAULT_SEED: &str = "panospace";

const SEED_HASH_BASIS: u32 = 0xDEAD_BEEF;
const SEED_HASH_PRIME: u32 = 2_654_435_761;
const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Immutable seed text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Seed(String);

impl Seed {
    /// Build a seed. Empty or whitespace-only input falls back to [`DEFAULT_SEED`].
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            tracing::debug!(default = DEFAULT_SEED, "empty seed, using default");
            return Self(DEFAULT_SEED.to_owned());
        }
        Self(text)
    }

    /// Seed text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 32-bit hash of the seed text (step 1 of the module-level pipeline).
    pub fn hash32(&self) -> u32 {
        hash_seed_str(&self.0)
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self(DEFAULT_SEED.to_owned())
    }
}

impl From<String> for Seed {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl From<Seed> for String {
    fn from(value: Seed) -> Self {
        value.0
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash a string over its UTF-16 code units.
pub fn hash_seed_str(text: &str) -> u32 {
    text.encode_utf16().fold(SEED_HASH_BASIS, |h, unit| {
        (h ^ u32::from(unit)).wrapping_mul(SEED_HASH_PRIME)
    })
}

/// Raw mulberry32 state. Advancing is a pure function of the value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RngState(pub u32);

impl RngState {
    /// State for a seed.
    pub fn from_seed(seed: &Seed) -> Self {
        Self(seed.hash32())
    }

    /// Next raw 32-bit output and the successor state.
    pub fn next_u32(self) -> (u32, Self) {
        let a = self.0.wrapping_add(MULBERRY_INCREMENT);
        let mut t = (a ^ (a >> 15)).wrapping_mul(a | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        (t ^ (t >> 14), Self(a))
    }

    /// Next float in `[0, 1)` and the successor state.
    pub fn next(self) -> (f64, Self) {
        let (v, s) = self.next_u32();
        (f64::from(v) / TWO_POW_32, s)
    }
}

/// Source of uniform draws used by the layout generators.
///
/// Generators are written against this trait so tests can drive them with adversarial streams.
pub trait Random {
    /// Next float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform float in `[min, max)`.
    fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform float in `[-0.5, 0.5)`.
    fn centered(&mut self) -> f64 {
        self.next_f64() - 0.5
    }

    /// Uniform index in `[0, n)`; `0` when `n == 0`.
    fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        ((self.next_f64() * n as f64) as usize).min(n - 1)
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniformly chosen element.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        let i = self.below(items.len());
        items.get(i)
    }
}

/// Mutable mulberry32 stream owned by exactly one generation pass.
#[derive(Clone, Debug)]
pub struct SeedRng {
    state: RngState,
    draws: u64,
}

impl SeedRng {
    /// Stream for a seed.
    pub fn from_seed(seed: &Seed) -> Self {
        Self::from_state(RngState::from_seed(seed))
    }

    /// Stream whose mulberry32 state is `n` (numeric seeds).
    pub fn from_u32(n: u32) -> Self {
        Self::from_state(RngState(n))
    }

    /// Stream for a raw state.
    pub fn from_state(state: RngState) -> Self {
        Self { state, draws: 0 }
    }

    /// Stream for `seed` extended with `salt`, e.g. a per-entity sub-stream.
    pub fn derive(seed: &Seed, salt: &str) -> Self {
        let mut text = String::with_capacity(seed.as_str().len() + salt.len());
        text.push_str(seed.as_str());
        text.push_str(salt);
        Self::from_state(RngState(hash_seed_str(&text)))
    }

    /// Current state.
    pub fn state(&self) -> RngState {
        self.state
    }

    /// Number of draws consumed so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Split off an independent child stream, consuming exactly one draw.
    pub fn fork(&mut self) -> SeedRng {
        let v = self.next_raw();
        SeedRng::from_state(RngState(v ^ SEED_HASH_BASIS))
    }

    fn next_raw(&mut self) -> u32 {
        let (v, next) = self.state.next_u32();
        self.state = next;
        self.draws += 1;
        v
    }
}

impl Random for SeedRng {
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_raw()) / TWO_POW_32
    }
}

impl RngCore for SeedRng {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_raw());
        let lo = u64::from(self.next_raw());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/rng.rs"]
mod tests;
