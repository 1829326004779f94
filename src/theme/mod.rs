//! Colours and seed-derived themes.

/// Straight-alpha colours and their serde forms.
pub mod color;
/// Theme families and seed-derived theme selection.
pub mod palette;
