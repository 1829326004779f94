/// Convenience result type used across seedscape.
pub type SceneResult<T> = Result<T, SceneError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Seeds never fail (empty seeds fall back to a default) and oversized entity requests are
/// clamped, so neither has a variant here.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// Invalid caller-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested scene kind is unknown or has no registered recipe.
    #[error("unsupported scene kind: {0}")]
    UnsupportedSceneKind(String),

    /// The drawing surface is missing or has no drawable area.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// A scene recipe failed while building its world.
    #[error("generation error: {0}")]
    Generation(String),

    /// Rasterization or presentation failed.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SceneError {
    /// Build a [`SceneError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SceneError::UnsupportedSceneKind`] value.
    pub fn unsupported_kind(kind: impl Into<String>) -> Self {
        Self::UnsupportedSceneKind(kind.into())
    }

    /// Build a [`SceneError::SurfaceUnavailable`] value.
    pub fn surface_unavailable(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }

    /// Build a [`SceneError::Generation`] value.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Build a [`SceneError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SceneError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
