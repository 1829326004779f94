use crate::foundation::error::{SceneError, SceneResult};
use crate::foundation::math::StableHasher;
use crate::theme::color::Color;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Caller-facing scene configuration.
///
/// Only `density` affects generation. Every other field is cosmetic: changing it redraws with new
/// parameters but never rebuilds the world.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct SceneConfig {
    /// Replaces the theme's accent and glow colours at draw time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_override: Option<Color>,
    /// Requested count for the scene's density-driven element. Clamped to the scene budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<u32>,
    /// Animation speed multiplier (default `1.0`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// `false` freezes the clock and renders a single static frame.
    pub animations_enabled: bool,
    /// Opaque aesthetic knobs (glow radii, sway speeds). Unknown keys are ignored by scenes.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tuning: BTreeMap<String, f64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            color_override: None,
            density: None,
            speed: None,
            animations_enabled: true,
            tuning: BTreeMap::new(),
        }
    }
}

impl SceneConfig {
    /// Parse a config from a JSON reader. The result is validated.
    pub fn from_reader<R: std::io::Read>(r: R) -> SceneResult<Self> {
        let cfg: SceneConfig = serde_json::from_reader(r)
            .map_err(|e| SceneError::serde(format!("parse scene config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SceneError::validation(format!("open scene config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check numeric ranges.
    pub fn validate(&self) -> SceneResult<()> {
        if let Some(speed) = self.speed
            && (!speed.is_finite() || speed < 0.0)
        {
            return Err(SceneError::validation(format!(
                "speed must be finite and >= 0, got {speed}"
            )));
        }
        for (k, v) in &self.tuning {
            if !v.is_finite() {
                return Err(SceneError::validation(format!(
                    "tuning value '{k}' must be finite"
                )));
            }
        }
        Ok(())
    }

    /// Effective speed multiplier.
    pub fn speed(&self) -> f64 {
        self.speed.unwrap_or(1.0)
    }

    /// Tunable `key`, or `default` when unset.
    pub fn tune(&self, key: &str, default: f64) -> f64 {
        self.tuning.get(key).copied().unwrap_or(default)
    }

    /// Hash of the generation-relevant subset of the config.
    pub fn generation_hash(&self) -> u64 {
        let mut h = StableHasher::new();
        match self.density {
            Some(d) => {
                h.write_u8(1);
                h.write_u32(d);
            }
            None => h.write_u8(0),
        }
        h.finish_u64()
    }

    /// Return `true` when switching from `self` to `other` requires a new world.
    pub fn regenerates(&self, other: &SceneConfig) -> bool {
        self.density != other.density
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
