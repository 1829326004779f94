//! Scene recipes and the world model they produce.
//!
//! A recipe turns a seeded RNG into a static [`model::WorldDescription`] once, then records a
//! frame from `(world, theme, time)` into a display list as often as the session asks.

/// Caller-facing scene configuration.
pub mod config;
/// L-system forest on a perspective ground plane.
pub mod forest;
/// Drifting deformable blobs.
pub mod metaball;
/// Static world model shared by every recipe.
pub mod model;
/// Twin planetary systems around a Fibonacci core.
pub mod orbital;
/// Recipe trait, registry, and per-frame context.
pub mod registry;
/// Static Memphis-style tiled pattern.
pub mod tiles;
/// Isometric voxel island.
pub mod voxel;
/// Looping city drive seen through a train window.
pub mod window;
