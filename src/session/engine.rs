use crate::foundation::core::Viewport;
use crate::foundation::error::{SceneError, SceneResult};
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::cpu::CpuBackend;
use crate::render::display_list::DisplayList;
use crate::rng::Seed;
use crate::scene::config::SceneConfig;
use crate::scene::model::{SceneKind, WorldDescription};
use crate::scene::registry::{FrameCtx, Generated, SceneRegistry, build_pool, record_frame};
use crate::session::cache::{CacheStats, DEFAULT_WORLD_CACHE, WorldCache, WorldKey};
use crate::session::clock::MAX_FRAME_DT;
use crate::session::generation::{GenerationMode, GenerationOutcome, GenerationRequest, Generator};
use crate::session::instance::{
    GenerationState, InstanceState, SceneInstance, Surface, SurfaceEvent,
};
use crate::session::scheduler::{FrameScheduler, SceneHandle};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Environment variable overriding [`EngineOpts::cache_capacity`].
pub const ENV_CACHE_CAPACITY: &str = "SEEDSCAPE_WORLD_CACHE_CAPACITY";
/// Environment variable overriding [`EngineOpts::threads`].
pub const ENV_GENERATION_THREADS: &str = "SEEDSCAPE_GENERATION_THREADS";

/// Engine options.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineOpts {
    /// Worlds kept in the LRU cache; `0` disables caching.
    pub cache_capacity: usize,
    /// Where generation runs.
    pub generation: GenerationMode,
    /// Background generation threads (rayon default when `None`).
    pub threads: Option<usize>,
    /// Largest clock step per tick, in seconds.
    pub max_frame_dt: f64,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_WORLD_CACHE,
            generation: GenerationMode::Background,
            threads: None,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl EngineOpts {
    /// Defaults with environment overrides applied. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Some(n) = std::env::var(ENV_CACHE_CAPACITY)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
        {
            opts.cache_capacity = n;
        }
        opts.threads = std::env::var(ENV_GENERATION_THREADS)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .or(opts.threads);
        opts
    }
}

/// Receives rendered frames.
pub trait Presenter {
    /// Show `frame` on the surface of `handle`.
    fn present(&mut self, handle: SceneHandle, frame: &FrameRGBA) -> SceneResult<()>;
}

/// What one [`Engine::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Generation results applied.
    pub generated: usize,
    /// Stale generation results dropped.
    pub stale: usize,
    /// Frames handed to the presenter.
    pub presented: usize,
    /// Frames that failed to render or present.
    pub failed: usize,
}

/// Lifecycle manager for every live scene.
///
/// Single-threaded and cooperative: the host calls [`Engine::tick`] once per display frame.
/// Only generation leaves the calling thread.
#[derive(Debug)]
pub struct Engine {
    opts: EngineOpts,
    registry: Arc<SceneRegistry>,
    instances: BTreeMap<SceneHandle, SceneInstance>,
    next_handle: u64,
    scheduler: FrameScheduler,
    cache: WorldCache,
    generator: Generator,
    reduced_motion: bool,
}

impl Engine {
    /// Engine with the built-in recipes.
    pub fn new(opts: EngineOpts) -> SceneResult<Self> {
        Self::with_registry(opts, SceneRegistry::with_defaults())
    }

    /// Engine over a custom registry.
    pub fn with_registry(opts: EngineOpts, registry: SceneRegistry) -> SceneResult<Self> {
        let registry = Arc::new(registry);
        let generator = Generator::new(Arc::clone(&registry), opts.generation, opts.threads)?;
        Ok(Self {
            opts,
            registry,
            instances: BTreeMap::new(),
            next_handle: 1,
            scheduler: FrameScheduler::new(),
            cache: WorldCache::new(opts.cache_capacity),
            generator,
            reduced_motion: false,
        })
    }

    /// Options in effect.
    pub fn opts(&self) -> &EngineOpts {
        &self.opts
    }

    /// Create a scene and start generating its world. Fails fast on an unregistered kind or an
    /// invalid config.
    #[tracing::instrument(skip(self, seed, config), fields(kind = %kind))]
    pub fn create_scene(
        &mut self,
        seed: impl Into<Seed>,
        kind: SceneKind,
        config: SceneConfig,
    ) -> SceneResult<SceneHandle> {
        config.validate()?;
        let recipe = self.registry.get(kind)?;
        let handle = SceneHandle(self.next_handle);
        self.next_handle += 1;
        let mut inst =
            SceneInstance::new(seed.into(), kind, config, recipe, self.opts.max_frame_dt);
        inst.set_frozen(self.reduced_motion || !inst.config.animations_enabled);
        self.instances.insert(handle, inst);
        self.regenerate(handle)?;
        tracing::debug!(%handle, "scene created");
        Ok(handle)
    }

    /// Attach `handle` to a surface and begin observing it.
    pub fn mount(&mut self, handle: SceneHandle, surface: Surface) -> SceneResult<()> {
        let inst = self.instance_mut(handle)?;
        let resubmit = inst.state == InstanceState::Unmounted
            && inst.generation() == GenerationState::Pending
            && inst.cancel.is_cancelled();
        inst.resize(surface.viewport);
        inst.set_visible(surface.visible);
        if resubmit {
            // An unmount cancelled the pending world; ask again.
            self.regenerate(handle)?;
        }
        self.reschedule(handle);
        Ok(())
    }

    /// Feed a surface observation to a mounted scene. Ignored for unmounted scenes.
    pub fn observe(&mut self, handle: SceneHandle, event: SurfaceEvent) -> SceneResult<()> {
        let inst = self.instance_mut(handle)?;
        if inst.state == InstanceState::Unmounted {
            return Ok(());
        }
        match event {
            SurfaceEvent::Resized(viewport) => inst.resize(viewport),
            SurfaceEvent::Visibility(visible) => inst.set_visible(visible),
        }
        self.reschedule(handle);
        Ok(())
    }

    /// Detach `handle` from its surface. Idempotent; unknown handles are ignored.
    ///
    /// Nothing is presented for `handle` after this returns, and a pending world is discarded.
    pub fn unmount(&mut self, handle: SceneHandle) {
        self.scheduler.cancel(handle);
        if let Some(inst) = self.instances.get_mut(&handle)
            && inst.state != InstanceState::Unmounted
        {
            if inst.generation() == GenerationState::Pending {
                inst.epoch += 1;
            }
            inst.detach();
            tracing::debug!(%handle, "scene unmounted");
        }
    }

    /// Unmount and forget `handle`.
    pub fn destroy(&mut self, handle: SceneHandle) {
        self.unmount(handle);
        self.instances.remove(&handle);
    }

    /// Host reduced-motion preference. Freezes every clock at phase zero while set.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        if self.reduced_motion == reduced {
            return;
        }
        self.reduced_motion = reduced;
        let handles: Vec<SceneHandle> = self.instances.keys().copied().collect();
        for h in handles {
            if let Some(inst) = self.instances.get_mut(&h) {
                inst.set_frozen(reduced || !inst.config.animations_enabled);
            }
            self.reschedule(h);
        }
    }

    /// Replace the config. Regenerates only when a generation-relevant field changed.
    pub fn update_config(&mut self, handle: SceneHandle, config: SceneConfig) -> SceneResult<()> {
        config.validate()?;
        let reduced = self.reduced_motion;
        let inst = self.instance_mut(handle)?;
        let regenerate = inst.config.regenerates(&config);
        inst.config = config;
        inst.set_frozen(reduced || !inst.config.animations_enabled);
        inst.request_redraw();
        if regenerate {
            self.regenerate(handle)?;
        }
        self.reschedule(handle);
        Ok(())
    }

    /// Change the seed and regenerate.
    pub fn set_seed(&mut self, handle: SceneHandle, seed: impl Into<Seed>) -> SceneResult<()> {
        let seed = seed.into();
        let inst = self.instance_mut(handle)?;
        if inst.seed == seed {
            return Ok(());
        }
        inst.seed = seed;
        self.regenerate(handle)?;
        self.reschedule(handle);
        Ok(())
    }

    /// Change the kind and regenerate. Fails fast on an unregistered kind.
    pub fn set_kind(&mut self, handle: SceneHandle, kind: SceneKind) -> SceneResult<()> {
        let recipe = self.registry.get(kind)?;
        let reduced = self.reduced_motion;
        let inst = self.instance_mut(handle)?;
        if inst.kind == kind {
            return Ok(());
        }
        inst.kind = kind;
        inst.recipe = recipe;
        inst.set_frozen(reduced || !inst.config.animations_enabled);
        self.regenerate(handle)?;
        self.reschedule(handle);
        Ok(())
    }

    /// Apply finished generation results and render every due scene.
    #[tracing::instrument(level = "trace", skip(self, presenter))]
    pub fn tick(&mut self, now: f64, presenter: &mut dyn Presenter) -> TickReport {
        let mut report = TickReport::default();
        for outcome in self.generator.drain() {
            self.apply_outcome(outcome, &mut report);
        }

        for handle in self.scheduler.take_due() {
            let Some(inst) = self.instances.get_mut(&handle) else {
                continue;
            };
            match inst.render(now) {
                Ok(Some(frame)) => match presenter.present(handle, &frame) {
                    Ok(()) => {
                        report.presented += 1;
                        continue;
                    }
                    Err(err) => tracing::warn!(%handle, error = %err, "present failed"),
                },
                Ok(None) => continue,
                Err(err) => tracing::warn!(%handle, error = %err, "render failed"),
            }
            report.failed += 1;
            // Static scenes are not polled, so a failed frame is retried on the next tick.
            inst.request_redraw();
            self.scheduler.schedule_once(handle);
        }
        report
    }

    /// Block until every pending generation has finished and apply the results.
    pub fn wait_for_generation(&mut self) -> TickReport {
        let mut report = TickReport::default();
        for outcome in self.generator.wait_all() {
            self.apply_outcome(outcome, &mut report);
        }
        report
    }

    /// Instance for `handle`.
    pub fn instance(&self, handle: SceneHandle) -> Option<&SceneInstance> {
        self.instances.get(&handle)
    }

    /// Mount state of `handle`.
    pub fn state(&self, handle: SceneHandle) -> Option<InstanceState> {
        self.instances.get(&handle).map(SceneInstance::state)
    }

    /// World of `handle`, once generated.
    pub fn world(&self, handle: SceneHandle) -> Option<Arc<WorldDescription>> {
        self.instances.get(&handle)?.world().cloned()
    }

    /// `true` when `handle` will render on the next tick.
    pub fn is_scheduled(&self, handle: SceneHandle) -> bool {
        self.scheduler.is_scheduled(handle)
    }

    /// World cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Live scene handles.
    pub fn handles(&self) -> impl Iterator<Item = SceneHandle> + '_ {
        self.instances.keys().copied()
    }

    fn instance_mut(&mut self, handle: SceneHandle) -> SceneResult<&mut SceneInstance> {
        self.instances
            .get_mut(&handle)
            .ok_or_else(|| SceneError::validation(format!("unknown scene handle {handle}")))
    }

    fn regenerate(&mut self, handle: SceneHandle) -> SceneResult<()> {
        let inst = self
            .instances
            .get_mut(&handle)
            .ok_or_else(|| SceneError::validation(format!("unknown scene handle {handle}")))?;
        let cancel = inst.begin_generation();
        let key = WorldKey::new(&inst.seed, inst.kind, &inst.config);
        if let Some(generated) = self.cache.get(&key) {
            tracing::trace!(%handle, "world cache hit");
            inst.accept(generated);
            return Ok(());
        }
        self.generator.submit(GenerationRequest {
            handle,
            epoch: inst.epoch,
            seed: inst.seed.clone(),
            kind: inst.kind,
            config: inst.config.clone(),
            cancel,
        });
        Ok(())
    }

    fn apply_outcome(&mut self, outcome: GenerationOutcome, report: &mut TickReport) {
        let GenerationOutcome {
            handle,
            epoch,
            key,
            result,
        } = outcome;
        if let Ok(generated) = &result {
            self.cache.insert(key, generated.clone());
        }
        let Some(inst) = self.instances.get_mut(&handle) else {
            report.stale += 1;
            return;
        };
        if inst.epoch != epoch {
            report.stale += 1;
            return;
        }
        match result {
            Ok(generated) => inst.accept(generated),
            Err(err) => inst.fail(&err),
        }
        report.generated += 1;
        self.reschedule(handle);
    }

    fn reschedule(&mut self, handle: SceneHandle) {
        let Some(inst) = self.instances.get(&handle) else {
            self.scheduler.cancel(handle);
            return;
        };
        if !inst.drawable() {
            self.scheduler.cancel(handle);
        } else if inst.animates(self.reduced_motion) {
            self.scheduler.schedule(handle);
        } else {
            self.scheduler.cancel(handle);
            if inst.needs_redraw() {
                self.scheduler.schedule_once(handle);
            }
        }
    }
}

/// Generate `kind` for `seed` on the calling thread and render one frame at `time`.
///
/// The pool is stepped forward to `time` so stills match a live scene that has run that long.
#[tracing::instrument(skip(seed, config), fields(kind = %kind))]
pub fn render_still(
    seed: &Seed,
    kind: SceneKind,
    config: &SceneConfig,
    viewport: Viewport,
    time: f64,
) -> SceneResult<(Generated, FrameRGBA)> {
    let registry = SceneRegistry::with_defaults();
    let recipe = registry.get(kind)?;
    let generated = registry.generate(seed, kind, config)?;
    let motion = config.animations_enabled && recipe.animated();
    let time = if motion && time.is_finite() { time.max(0.0) } else { 0.0 };

    let mut pool = build_pool(recipe.as_ref(), &generated);
    let mut t = 0.0;
    while t < time {
        let dt = (time - t).min(MAX_FRAME_DT);
        pool.advance(dt);
        t += dt;
    }

    let frame = FrameCtx::new(&generated, config, &viewport, time, motion, &pool, recipe.fit());
    let mut list = DisplayList::new();
    record_frame(recipe.as_ref(), &frame, &mut list);
    let mut backend = CpuBackend::default();
    let out = backend.render(&list, &viewport)?;
    Ok((generated, out))
}

#[cfg(test)]
#[path = "../../tests/unit/session/engine.rs"]
mod tests;
