use crate::foundation::core::{Affine, Point, Rect, Viewport};
use crate::foundation::error::{SceneError, SceneResult};
use crate::layout::budget::Budget;
use crate::pool::{EntityPool, PoolItem, PoolSpec};
use crate::rng::{Seed, SeedRng};
use crate::render::display_list::DisplayList;
use crate::scene::config::SceneConfig;
use crate::scene::model::{SceneKind, WorldDescription};
use crate::theme::palette::{Theme, derive_theme};
use rand_core::RngCore;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Width of the canonical world frame every recipe lays out in.
pub const WORLD_WIDTH: f64 = 1200.0;
/// Height of the canonical world frame.
pub const WORLD_HEIGHT: f64 = 400.0;

/// The canonical world frame.
pub fn world_bounds() -> Rect {
    Rect::new(0.0, 0.0, WORLD_WIDTH, WORLD_HEIGHT)
}

/// How the world frame maps onto a viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Fit {
    /// Uniform scale that covers the viewport, centred; overflow is cropped.
    Cover,
    /// Independent axis scales so the frame fills the viewport exactly.
    Stretch,
}

impl Fit {
    /// World-to-layout-pixel transform for `viewport`.
    pub fn transform(self, bounds: Rect, viewport: &Viewport) -> Affine {
        let bw = bounds.width();
        let bh = bounds.height();
        if bw <= 0.0 || bh <= 0.0 || !viewport.is_drawable() {
            return Affine::IDENTITY;
        }
        let sx = viewport.width / bw;
        let sy = viewport.height / bh;
        match self {
            Fit::Cover => {
                let s = sx.max(sy);
                let tx = (viewport.width - bw * s) * 0.5 - bounds.x0 * s;
                let ty = (viewport.height - bh * s) * 0.5 - bounds.y0 * s;
                Affine::new([s, 0.0, 0.0, s, tx, ty])
            }
            Fit::Stretch => Affine::new([sx, 0.0, 0.0, sy, -bounds.x0 * sx, -bounds.y0 * sy]),
        }
    }
}

/// A scene recipe: generation plus a pure per-frame draw routine.
///
/// `generate` runs once per `(seed, kind, generation config)` and must be deterministic in
/// `rng`. `draw` records into world coordinates; the caller maps the list onto the viewport.
pub trait SceneRecipe: Send + Sync {
    /// Kind this recipe implements.
    fn kind(&self) -> SceneKind;

    /// Default and cap of the density-driven element.
    fn budget(&self) -> Budget;

    /// Build the static world. The theme has already consumed its draws from `rng`.
    fn generate(&self, rng: &mut SeedRng, config: &SceneConfig) -> SceneResult<WorldDescription>;

    /// Dynamic pool, if the scene has one.
    fn pool_spec(&self) -> Option<PoolSpec> {
        None
    }

    /// `false` for scenes that render once per resize.
    fn animated(&self) -> bool {
        true
    }

    /// World-to-viewport mapping.
    fn fit(&self) -> Fit {
        Fit::Cover
    }

    /// Record one frame.
    fn draw(&self, out: &mut DisplayList, frame: &FrameCtx<'_>);
}

/// Output of one generation pass. Shared read-only between the cache and instances.
#[derive(Clone, Debug, PartialEq)]
pub struct Generated {
    /// Static world.
    pub world: Arc<WorldDescription>,
    /// Derived theme (without the cosmetic colour override).
    pub theme: Arc<Theme>,
    /// Seed of the dynamic pool stream, drawn after the world.
    pub pool_seed: u32,
}

/// Read-only inputs to one `draw` call.
#[derive(Debug)]
pub struct FrameCtx<'a> {
    /// World being drawn.
    pub world: &'a WorldDescription,
    /// Theme with the colour override applied.
    pub theme: Theme,
    /// Caller config (cosmetic fields apply here).
    pub config: &'a SceneConfig,
    /// Scene time in seconds.
    pub time: f64,
    /// `false` when the clock is frozen; scenes show their settled state.
    pub motion: bool,
    /// Live pool elements.
    pub pool: &'a [PoolItem],
    /// Part of the world frame visible in the viewport.
    pub view: Rect,
    transform: Affine,
}

impl<'a> FrameCtx<'a> {
    /// Build the context for `viewport` at `time`.
    pub fn new(
        generated: &'a Generated,
        config: &'a SceneConfig,
        viewport: &Viewport,
        time: f64,
        motion: bool,
        pool: &'a EntityPool,
        fit: Fit,
    ) -> Self {
        let world: &WorldDescription = &generated.world;
        let transform = fit.transform(world.bounds, viewport);
        let view = if viewport.is_drawable() {
            transform.inverse().transform_rect_bbox(viewport.rect())
        } else {
            world.bounds
        };
        Self {
            world,
            theme: generated.theme.with_override(config.color_override),
            config,
            time,
            motion,
            pool: pool.items(),
            view,
            transform,
        }
    }

    /// World-to-layout-pixel transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Pool element position in world coordinates (pools are normalised to the viewport).
    pub fn pool_point(&self, item: &PoolItem) -> Point {
        Point::new(
            self.view.x0 + item.position.x * self.view.width(),
            self.view.y0 + item.position.y * self.view.height(),
        )
    }

    /// Tunable `key`, or `default`.
    pub fn tune(&self, key: &str, default: f64) -> f64 {
        self.config.tune(key, default)
    }
}

/// Record a full frame for `recipe` and map it onto the viewport.
pub fn record_frame(recipe: &dyn SceneRecipe, frame: &FrameCtx<'_>, out: &mut DisplayList) {
    out.reset();
    recipe.draw(out, frame);
    out.transform(frame.transform());
}

/// Closed registry of scene recipes, keyed by kind.
#[derive(Clone)]
pub struct SceneRegistry {
    recipes: BTreeMap<SceneKind, Arc<dyn SceneRecipe>>,
}

impl std::fmt::Debug for SceneRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneRegistry")
            .field("kinds", &self.recipes.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl SceneRegistry {
    /// Registry without recipes.
    pub fn empty() -> Self {
        Self {
            recipes: BTreeMap::new(),
        }
    }

    /// Registry with every built-in recipe.
    pub fn with_defaults() -> Self {
        let mut r = Self::empty();
        r.register(Arc::new(crate::scene::voxel::VoxelIsland));
        r.register(Arc::new(crate::scene::orbital::Orbital));
        r.register(Arc::new(crate::scene::forest::FractalForest));
        r.register(Arc::new(crate::scene::metaball::MetaballField));
        r.register(Arc::new(crate::scene::window::ParallaxWindow));
        r.register(Arc::new(crate::scene::tiles::TiledPattern));
        r
    }

    /// Add or replace the recipe for its kind.
    pub fn register(&mut self, recipe: Arc<dyn SceneRecipe>) {
        self.recipes.insert(recipe.kind(), recipe);
    }

    /// Recipe for `kind`.
    pub fn get(&self, kind: SceneKind) -> SceneResult<Arc<dyn SceneRecipe>> {
        self.recipes
            .get(&kind)
            .cloned()
            .ok_or_else(|| SceneError::unsupported_kind(kind.as_str()))
    }

    /// Registered kinds in order.
    pub fn kinds(&self) -> impl Iterator<Item = SceneKind> + '_ {
        self.recipes.keys().copied()
    }

    /// Run one generation pass: theme first, then the world, then the pool seed.
    ///
    /// Pure in its inputs, so it may run on any thread.
    #[tracing::instrument(skip(self, config), fields(seed = %seed, kind = %kind))]
    pub fn generate(
        &self,
        seed: &Seed,
        kind: SceneKind,
        config: &SceneConfig,
    ) -> SceneResult<Generated> {
        config.validate()?;
        let recipe = self.get(kind)?;
        let mut rng = SeedRng::from_seed(seed);
        let theme = derive_theme(&mut rng);
        let world = recipe.generate(&mut rng, config)?;
        if world.kind != kind {
            return Err(SceneError::generation(format!(
                "recipe for {kind} produced a {} world",
                world.kind
            )));
        }
        let pool_seed = rng.next_u32();
        let budget = recipe.budget();
        tracing::debug!(
            entities = world.entities.len(),
            density = ?config.density,
            budget_cap = budget.cap,
            draws = rng.draws(),
            "generated world"
        );
        Ok(Generated {
            world: Arc::new(world),
            theme: Arc::new(theme),
            pool_seed,
        })
    }
}

/// Pool for a generated world, or an empty pool when the recipe has none.
pub fn build_pool(recipe: &dyn SceneRecipe, generated: &Generated) -> EntityPool {
    match recipe.pool_spec() {
        Some(spec) => EntityPool::new(spec, SeedRng::from_u32(generated.pool_seed)),
        None => EntityPool::empty(),
    }
}

/// Generate `kind` for `seed` and record one frame at the canonical size.
#[cfg(test)]
pub(crate) fn record_for_test(
    kind: SceneKind,
    seed: &str,
    config: &SceneConfig,
    time: f64,
    motion: bool,
) -> (Generated, DisplayList) {
    let registry = SceneRegistry::with_defaults();
    let recipe = registry.get(kind).expect("registered");
    let generated = registry
        .generate(&Seed::new(seed), kind, config)
        .expect("generate");
    let pool = build_pool(recipe.as_ref(), &generated);
    let viewport = Viewport::new(WORLD_WIDTH, WORLD_HEIGHT, 1.0);
    let frame = FrameCtx::new(&generated, config, &viewport, time, motion, &pool, recipe.fit());
    let mut out = DisplayList::new();
    record_frame(recipe.as_ref(), &frame, &mut out);
    (generated, out)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/registry.rs"]
mod tests;
