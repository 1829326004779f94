use crate::foundation::core::Rect;
use crate::rng::Random;

/// Hard recursion limit, applied on top of any caller-supplied depth.
pub const MAX_SUBDIVISION_DEPTH: u32 = 12;

const RATIO_MIN: f64 = 0.2;
const RATIO_MAX: f64 = 0.8;
const AXIS_BIAS: f64 = 1.1;
const EARLY_STOP_DEPTH: u32 = 6;
const EARLY_STOP_SIZE: f64 = 60.0;

/// How the split axis is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SplitPolicy {
    /// Split the clearly longer side; coin flip when the sides are within 10%.
    LongestAxis,
    /// Always split vertically (side-by-side columns).
    Columns,
}

/// Parameters for [`subdivide`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubdivisionParams {
    /// Requested maximum depth, clamped to [`MAX_SUBDIVISION_DEPTH`].
    pub max_depth: u32,
    /// A rectangle stops splitting once both sides are below this.
    pub min_size: f64,
    /// Spacing left between siblings.
    pub gap: f64,
    /// `0` splits exactly in half; `1` allows the full `[0.2, 0.8]` range.
    pub ratio_jitter: f64,
    /// Randomly stop small rectangles near the bottom of the tree.
    pub early_stop: bool,
    /// Axis selection.
    pub policy: SplitPolicy,
}

impl Default for SubdivisionParams {
    fn default() -> Self {
        Self {
            max_depth: 8,
            min_size: 40.0,
            gap: 2.0,
            ratio_jitter: 0.0,
            early_stop: true,
            policy: SplitPolicy::LongestAxis,
        }
    }
}

/// One leaf of the subdivision.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Cell {
    /// Cell bounds.
    pub rect: Rect,
    /// Number of splits above this cell.
    pub depth: u32,
}

/// Recursively split `bounds` into cells.
///
/// Cells are emitted left/top first. Output has at most `2^min(max_depth, 12)` cells for any RNG
/// stream.
#[tracing::instrument(skip(rng), level = "trace")]
pub fn subdivide(rng: &mut impl Random, bounds: Rect, params: &SubdivisionParams) -> Vec<Cell> {
    let max_depth = params.max_depth.min(MAX_SUBDIVISION_DEPTH);
    let mut out = Vec::new();
    // (rect, remaining depth). Right/bottom child is pushed first so the left/top subtree draws
    // from the RNG before its sibling.
    let mut stack: Vec<(Rect, u32)> = vec![(bounds, max_depth)];

    while let Some((rect, remaining)) = stack.pop() {
        let depth = max_depth - remaining;
        let w = rect.width();
        let h = rect.height();

        if should_stop(rng, w, h, remaining, params) {
            out.push(Cell { rect, depth });
            continue;
        }

        let vertical = match params.policy {
            SplitPolicy::Columns => true,
            SplitPolicy::LongestAxis => {
                if w > h * AXIS_BIAS {
                    true
                } else if h > w * AXIS_BIAS {
                    false
                } else {
                    rng.next_f64() > 0.5
                }
            }
        };

        let ratio = if params.ratio_jitter > 0.0 {
            (0.5 + rng.centered() * params.ratio_jitter).clamp(RATIO_MIN, RATIO_MAX)
        } else {
            0.5
        };

        let half_gap = params.gap * 0.5;
        let (first, second) = if vertical {
            let w1 = (w * ratio).floor();
            (
                Rect::new(rect.x0, rect.y0, rect.x0 + w1 - half_gap, rect.y1),
                Rect::new(rect.x0 + w1 + half_gap, rect.y0, rect.x1, rect.y1),
            )
        } else {
            let h1 = (h * ratio).floor();
            (
                Rect::new(rect.x0, rect.y0, rect.x1, rect.y0 + h1 - half_gap),
                Rect::new(rect.x0, rect.y0 + h1 + half_gap, rect.x1, rect.y1),
            )
        };

        if first.width() <= 0.0
            || first.height() <= 0.0
            || second.width() <= 0.0
            || second.height() <= 0.0
        {
            out.push(Cell { rect, depth });
            continue;
        }

        stack.push((second, remaining - 1));
        stack.push((first, remaining - 1));
    }

    tracing::trace!(cells = out.len(), max_depth, "subdivision complete");
    out
}

fn should_stop(
    rng: &mut impl Random,
    w: f64,
    h: f64,
    remaining: u32,
    params: &SubdivisionParams,
) -> bool {
    if remaining == 0 {
        return true;
    }
    if w < params.min_size && h < params.min_size {
        return true;
    }
    params.early_stop
        && remaining < EARLY_STOP_DEPTH
        && w < EARLY_STOP_SIZE
        && h < EARLY_STOP_SIZE
        && rng.next_f64() > 0.5
}

#[cfg(test)]
#[path = "../../tests/unit/layout/subdivide.rs"]
mod tests;
