//! Scene lifecycle: instances, clocks, scheduling, and off-thread generation.
//!
//! The [`engine::Engine`] owns every live [`instance::SceneInstance`]. Hosts drive it with one
//! [`engine::Engine::tick`] per display frame and receive pixels through a
//! [`engine::Presenter`]. Worlds are generated once per `(seed, kind, density)` and shared
//! through an LRU [`cache::WorldCache`].

/// LRU cache of generated worlds.
pub mod cache;
/// Per-instance animation clock.
pub mod clock;
/// Lifecycle manager and frame presentation.
pub mod engine;
pub mod generation;
/// Mutable state of one live scene.
pub mod instance;
/// Cooperative frame scheduling.
pub mod scheduler;
