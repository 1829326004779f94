use std::collections::BTreeSet;

/// Opaque identifier of a scene instance.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct SceneHandle(pub u64);

impl std::fmt::Display for SceneHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scene#{}", self.0)
    }
}

/// Cooperative frame scheduler.
///
/// Continuous entries run on every tick; one-shot entries run on the next tick only. Being
/// suspended means "not in either set". Due handles come out in ascending order.
#[derive(Clone, Debug, Default)]
pub struct FrameScheduler {
    continuous: BTreeSet<SceneHandle>,
    once: BTreeSet<SceneHandle>,
}

impl FrameScheduler {
    /// Empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `handle` on every tick.
    pub fn schedule(&mut self, handle: SceneHandle) {
        self.once.remove(&handle);
        self.continuous.insert(handle);
    }

    /// Run `handle` on the next tick only, unless it is already continuous.
    pub fn schedule_once(&mut self, handle: SceneHandle) {
        if !self.continuous.contains(&handle) {
            self.once.insert(handle);
        }
    }

    /// Drop every pending run of `handle`.
    pub fn cancel(&mut self, handle: SceneHandle) {
        self.continuous.remove(&handle);
        self.once.remove(&handle);
    }

    /// `true` when `handle` will run on the next tick.
    pub fn is_scheduled(&self, handle: SceneHandle) -> bool {
        self.continuous.contains(&handle) || self.once.contains(&handle)
    }

    /// `true` when `handle` runs on every tick.
    pub fn is_continuous(&self, handle: SceneHandle) -> bool {
        self.continuous.contains(&handle)
    }

    /// Handles due this tick. One-shot entries are consumed.
    pub fn take_due(&mut self) -> Vec<SceneHandle> {
        let once = std::mem::take(&mut self.once);
        let mut due: Vec<SceneHandle> = self.continuous.union(&once).copied().collect();
        due.dedup();
        due
    }

    /// Number of scheduled handles.
    pub fn len(&self) -> usize {
        self.continuous.len() + self.once.len()
    }

    /// `true` when nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.continuous.is_empty() && self.once.is_empty()
    }
}
