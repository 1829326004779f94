/// Default and hard cap for a density-driven element count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Budget {
    /// Count used when the caller does not request one.
    pub default: u32,
    /// Hard upper bound.
    pub cap: u32,
}

impl Budget {
    /// Build a budget. `default` is clamped to `cap`.
    pub const fn new(default: u32, cap: u32) -> Self {
        let default = if default > cap { cap } else { default };
        Self { default, cap }
    }

    /// Effective count for a requested density.
    pub fn resolve(self, requested: Option<u32>, what: &'static str) -> usize {
        let requested = requested.unwrap_or(self.default);
        clamp_count(requested as usize, self.cap as usize, what)
    }
}

/// Clamp `requested` to `cap`, emitting one debug event when clamping happens.
///
/// Over-budget requests are never an error.
pub fn clamp_count(requested: usize, cap: usize, what: &'static str) -> usize {
    if requested > cap {
        tracing::debug!(what, requested, cap, "request exceeds generation budget, clamping");
        return cap;
    }
    requested
}
