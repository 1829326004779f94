//! World generation off the frame path.
//!
//! Generation is pure, so requests can run on a rayon pool. Results come back over a channel
//! tagged with the epoch of the request; the engine drops results whose epoch is stale.

use crate::foundation::error::{SceneError, SceneResult};
use crate::rng::Seed;
use crate::scene::config::SceneConfig;
use crate::scene::model::SceneKind;
use crate::scene::registry::{Generated, SceneRegistry};
use crate::session::cache::WorldKey;
use crate::session::scheduler::SceneHandle;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};

/// Where generation runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerationMode {
    /// On the caller's thread, completed before `submit` returns.
    Inline,
    /// On a dedicated rayon pool.
    #[default]
    Background,
}

/// Shared flag that tells a queued request to skip its work.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// `true` once cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// One generation job.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    /// Instance the world is for.
    pub handle: SceneHandle,
    /// Instance epoch at submission.
    pub epoch: u64,
    /// Seed.
    pub seed: Seed,
    /// Kind.
    pub kind: SceneKind,
    /// Caller config.
    pub config: SceneConfig,
    /// Cancellation flag.
    pub cancel: CancelToken,
}

impl GenerationRequest {
    /// Cache key of the request.
    pub fn key(&self) -> WorldKey {
        WorldKey::new(&self.seed, self.kind, &self.config)
    }
}

/// Result of one job.
#[derive(Debug)]
pub struct GenerationOutcome {
    /// Instance the world is for.
    pub handle: SceneHandle,
    /// Epoch of the request.
    pub epoch: u64,
    /// Cache key.
    pub key: WorldKey,
    /// World or the failure.
    pub result: SceneResult<Generated>,
}

enum Runner {
    Inline {
        ready: Vec<GenerationOutcome>,
    },
    Background {
        pool: rayon::ThreadPool,
        tx: Sender<GenerationOutcome>,
        rx: Receiver<GenerationOutcome>,
    },
}

/// Runs generation requests and hands back their outcomes.
pub struct Generator {
    registry: Arc<SceneRegistry>,
    runner: Runner,
    in_flight: usize,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self.runner {
            Runner::Inline { .. } => GenerationMode::Inline,
            Runner::Background { .. } => GenerationMode::Background,
        };
        f.debug_struct("Generator")
            .field("mode", &mode)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

impl Generator {
    /// Generator in `mode`. `threads` sizes the background pool (rayon default when `None`).
    pub fn new(
        registry: Arc<SceneRegistry>,
        mode: GenerationMode,
        threads: Option<usize>,
    ) -> SceneResult<Self> {
        let runner = match mode {
            GenerationMode::Inline => Runner::Inline { ready: Vec::new() },
            GenerationMode::Background => {
                let (tx, rx) = channel();
                Runner::Background {
                    pool: build_thread_pool(threads)?,
                    tx,
                    rx,
                }
            }
        };
        Ok(Self {
            registry,
            runner,
            in_flight: 0,
        })
    }

    /// Requests submitted but not yet collected.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Queue a request.
    pub fn submit(&mut self, req: GenerationRequest) {
        self.in_flight += 1;
        match &mut self.runner {
            Runner::Inline { ready } => ready.push(run(&self.registry, req)),
            Runner::Background { pool, tx, .. } => {
                let registry = Arc::clone(&self.registry);
                let tx = tx.clone();
                pool.spawn(move || {
                    // The receiver lives as long as the generator; a send error means shutdown.
                    let _ = tx.send(run(&registry, req));
                });
            }
        }
    }

    /// Outcomes that are ready now, without blocking.
    pub fn drain(&mut self) -> Vec<GenerationOutcome> {
        let out = match &mut self.runner {
            Runner::Inline { ready } => std::mem::take(ready),
            Runner::Background { rx, .. } => {
                let mut out = Vec::new();
                loop {
                    match rx.try_recv() {
                        Ok(o) => out.push(o),
                        Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
                    }
                }
                out
            }
        };
        self.in_flight = self.in_flight.saturating_sub(out.len());
        out
    }

    /// Block until every submitted request has produced an outcome.
    pub fn wait_all(&mut self) -> Vec<GenerationOutcome> {
        let mut out = self.drain();
        if let Runner::Background { rx, .. } = &self.runner {
            while self.in_flight > 0 {
                match rx.recv() {
                    Ok(o) => {
                        self.in_flight -= 1;
                        out.push(o);
                    }
                    Err(_) => {
                        self.in_flight = 0;
                        break;
                    }
                }
            }
        }
        out
    }
}

#[tracing::instrument(
    skip(registry, req),
    fields(handle = %req.handle, epoch = req.epoch, kind = %req.kind)
)]
fn run(registry: &SceneRegistry, req: GenerationRequest) -> GenerationOutcome {
    let key = req.key();
    let result = if req.cancel.is_cancelled() {
        tracing::trace!("generation cancelled before start");
        Err(SceneError::generation("cancelled"))
    } else {
        registry.generate(&req.seed, req.kind, &req.config)
    };
    GenerationOutcome {
        handle: req.handle,
        epoch: req.epoch,
        key,
        result,
    }
}

fn build_thread_pool(threads: Option<usize>) -> SceneResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SceneError::validation(
            "generation threads must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("seedscape-gen-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SceneError::generation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/generation.rs"]
mod tests;
