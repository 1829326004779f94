//! Deterministic procedural scenes.
//!
//! A short seed string drives a fixed pipeline: the seed hashes to a 32-bit state, the theme
//! draws its palette first, then a scene recipe lays out a static world. Frames are a pure
//! function of that world, its theme, and elapsed time, so the same seed always reproduces the
//! same scene.
//!
//! - [`scene`]: world model and the six recipes
//! - [`session`]: instance lifecycle, scheduling, and background generation
//! - [`render`]: display lists and the CPU rasterizer
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub(crate) mod foundation;

pub mod layout;
pub mod pool;
pub mod projection;
pub mod render;
pub mod rng;
pub mod scene;
pub mod session;
pub mod theme;

pub use foundation::core::{
    Affine, BezPath, MAX_SURFACE_PX, Point, Point3, Rect, Rgba8Premul, Size, Vec2, Viewport,
};
pub use foundation::error::{SceneError, SceneResult};
pub use foundation::math::Fingerprint;
pub use render::backend::{FrameRGBA, RenderBackend};
pub use render::cpu::{CpuBackend, CpuBackendOpts};
pub use render::display_list::DisplayList;
pub use rng::{Seed, SeedRng};
pub use scene::config::SceneConfig;
pub use scene::model::{SceneKind, WorldDescription};
pub use scene::registry::{SceneRecipe, SceneRegistry};
pub use session::engine::{Engine, EngineOpts, Presenter, TickReport, render_still};
pub use session::instance::{GenerationState, InstanceState, Surface, SurfaceEvent};
pub use session::scheduler::SceneHandle;
pub use theme::color::Color;
pub use theme::palette::Theme;
