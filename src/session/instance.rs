use crate::foundation::core::Viewport;
use crate::foundation::error::{SceneError, SceneResult};
use crate::pool::EntityPool;
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::cpu::CpuBackend;
use crate::render::display_list::DisplayList;
use crate::rng::Seed;
use crate::scene::config::SceneConfig;
use crate::scene::model::{SceneKind, WorldDescription};
use crate::scene::registry::{FrameCtx, Generated, SceneRecipe, build_pool, record_frame};
use crate::session::clock::Clock;
use crate::session::generation::CancelToken;
use std::sync::Arc;

/// Mount state of an instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InstanceState {
    /// Not attached to a surface.
    Unmounted,
    /// Attached, but off screen. Never scheduled.
    Invisible,
    /// Attached and on screen.
    Visible,
}

/// Progress of the instance's world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerationState {
    /// Requested, not yet delivered.
    Pending,
    /// World available.
    Ready,
    /// Generation failed; nothing is drawn until the next regeneration.
    Failed,
}

/// Drawing surface handed to `mount`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    /// Current size.
    pub viewport: Viewport,
    /// Whether the surface is on screen.
    pub visible: bool,
}

/// Change observed on a mounted surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceEvent {
    /// New size or device pixel ratio.
    Resized(Viewport),
    /// Entered or left the screen.
    Visibility(bool),
}

/// One live scene: static world plus all mutable per-frame state.
pub struct SceneInstance {
    pub(crate) seed: Seed,
    pub(crate) kind: SceneKind,
    pub(crate) config: SceneConfig,
    pub(crate) recipe: Arc<dyn SceneRecipe>,
    pub(crate) state: InstanceState,
    pub(crate) epoch: u64,
    pub(crate) cancel: CancelToken,
    generation: GenerationState,
    generated: Option<Generated>,
    viewport: Viewport,
    surface: Option<(u32, u32)>,
    clock: Clock,
    pool: EntityPool,
    list: DisplayList,
    backend: CpuBackend,
    needs_redraw: bool,
    warned: bool,
    frames: u64,
}

impl std::fmt::Debug for SceneInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneInstance")
            .field("seed", &self.seed)
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("epoch", &self.epoch)
            .field("viewport", &self.viewport)
            .field("time", &self.clock.time())
            .field("frames", &self.frames)
            .finish()
    }
}

impl SceneInstance {
    pub(crate) fn new(
        seed: Seed,
        kind: SceneKind,
        config: SceneConfig,
        recipe: Arc<dyn SceneRecipe>,
        max_dt: f64,
    ) -> Self {
        Self {
            seed,
            kind,
            config,
            recipe,
            state: InstanceState::Unmounted,
            epoch: 0,
            cancel: CancelToken::new(),
            generation: GenerationState::Pending,
            generated: None,
            viewport: Viewport::empty(),
            surface: None,
            clock: Clock::new(max_dt),
            pool: EntityPool::empty(),
            list: DisplayList::new(),
            backend: CpuBackend::default(),
            needs_redraw: true,
            warned: false,
            frames: 0,
        }
    }

    /// Mount state.
    pub fn state(&self) -> InstanceState {
        self.state
    }

    /// World progress.
    pub fn generation(&self) -> GenerationState {
        self.generation
    }

    /// Seed.
    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Kind.
    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    /// Current config.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// World, once ready.
    pub fn world(&self) -> Option<&Arc<WorldDescription>> {
        self.generated.as_ref().map(|g| &g.world)
    }

    /// Current surface size.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Allocated surface pixels, or `None` while deferred.
    pub fn surface_pixels(&self) -> Option<(u32, u32)> {
        self.surface
    }

    /// Scene time in seconds.
    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    /// Live pool.
    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    /// Frames rendered since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// `true` when the scene should render every tick.
    pub(crate) fn animates(&self, reduced_motion: bool) -> bool {
        self.recipe.animated() && self.config.animations_enabled && !reduced_motion
    }

    /// `true` when a frame can be produced now.
    pub(crate) fn drawable(&self) -> bool {
        self.state == InstanceState::Visible
            && self.generation == GenerationState::Ready
            && self.surface.is_some()
    }

    pub(crate) fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub(crate) fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Start a new generation round. Returns the token of the new round.
    pub(crate) fn begin_generation(&mut self) -> CancelToken {
        self.cancel.cancel();
        self.cancel = CancelToken::new();
        self.epoch += 1;
        self.generation = GenerationState::Pending;
        self.generated = None;
        self.pool = EntityPool::empty();
        self.clock.reset();
        self.warned = false;
        self.needs_redraw = true;
        self.cancel.clone()
    }

    /// Install a generated world.
    pub(crate) fn accept(&mut self, generated: Generated) {
        self.pool = build_pool(self.recipe.as_ref(), &generated);
        self.generated = Some(generated);
        self.generation = GenerationState::Ready;
        self.needs_redraw = true;
    }

    /// Record a failed generation. Logs once per round.
    pub(crate) fn fail(&mut self, err: &SceneError) {
        self.generation = GenerationState::Failed;
        self.generated = None;
        if !self.warned {
            self.warned = true;
            tracing::warn!(
                seed = %self.seed,
                kind = %self.kind,
                error = %err,
                "scene generation failed; rendering nothing"
            );
        }
    }

    /// Apply a new surface size. A zero-sized surface defers rendering until the next resize.
    pub(crate) fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport && self.surface.is_some() {
            return;
        }
        self.viewport = viewport;
        self.backend.release_surface();
        self.surface = match viewport.pixel_size() {
            Ok(px) => Some(px),
            Err(err) => {
                tracing::debug!(error = %err, "surface unavailable, deferring render");
                None
            }
        };
        self.needs_redraw = true;
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        let next = if visible {
            InstanceState::Visible
        } else {
            InstanceState::Invisible
        };
        if next != self.state {
            self.state = next;
            self.clock.suspend();
            if visible {
                self.needs_redraw = true;
            }
        }
    }

    pub(crate) fn detach(&mut self) {
        self.cancel.cancel();
        self.state = InstanceState::Unmounted;
        self.surface = None;
        self.viewport = Viewport::empty();
        self.backend.release_surface();
        self.clock.suspend();
    }

    pub(crate) fn set_frozen(&mut self, frozen: bool) {
        if frozen != self.clock.is_frozen() {
            if frozen {
                self.clock.freeze();
            } else {
                self.clock.unfreeze();
            }
            self.needs_redraw = true;
        }
    }

    /// Advance the clock to `now` and render one frame.
    ///
    /// Returns `Ok(None)` when the instance has nothing to draw.
    #[tracing::instrument(level = "trace", skip(self), fields(kind = %self.kind))]
    pub(crate) fn render(&mut self, now: f64) -> SceneResult<Option<FrameRGBA>> {
        let Some(generated) = self.generated.as_ref().filter(|_| self.drawable()) else {
            return Ok(None);
        };
        let motion = !self.clock.is_frozen();
        let dt = self.clock.tick(now, self.config.speed());
        if motion && dt > 0.0 {
            self.pool.advance(dt);
        }
        let frame = FrameCtx::new(
            generated,
            &self.config,
            &self.viewport,
            self.clock.time(),
            motion,
            &self.pool,
            self.recipe.fit(),
        );
        record_frame(self.recipe.as_ref(), &frame, &mut self.list);
        let out = self.backend.render(&self.list, &self.viewport)?;
        self.needs_redraw = false;
        self.frames += 1;
        Ok(Some(out))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/instance.rs"]
mod tests;
