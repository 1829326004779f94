//! Structural generators shared by the scene recipes.
//!
//! Every generator takes its randomness through [`crate::rng::Random`] and a capped element budget,
//! so generation is `O(n)` in the clamped count and terminates for any RNG stream.

/// Default counts and hard caps for density-driven elements.
pub mod budget;
/// Depth-capped L-system branching.
pub mod lsystem;
/// Particle scatter patterns.
pub mod scatter;
/// Golden-angle point distributions.
pub mod sphere;
/// Recursive rectangular subdivision.
pub mod subdivide;
