use crate::foundation::core::{Point, Vec2};
use crate::rng::Random;

/// Hard recursion limit for branching.
pub const MAX_BRANCH_DEPTH: u32 = 7;
/// Segment budget per tree.
pub const MAX_SEGMENTS: usize = 4096;
/// Leaf budget per tree.
pub const MAX_LEAVES: usize = 8192;

/// Branching parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BranchParams {
    /// Number of forking levels, clamped to [`MAX_BRANCH_DEPTH`].
    pub depth: u32,
    /// Trunk length.
    pub length: f64,
    /// Trunk width.
    pub width: f64,
    /// Full angular spread of a fork in degrees (children rotate by `±spread/2`).
    pub spread_deg: f64,
    /// Forks with two children when the draw exceeds this, otherwise three.
    pub fork_threshold: f64,
    /// Child length is `parent * (length_min + r * length_range)`.
    pub length_min: f64,
    /// See `length_min`.
    pub length_range: f64,
    /// Child width is `parent * width_factor`.
    pub width_factor: f64,
    /// Leaves per terminal are `leaves_min + floor(r * leaves_extra)`.
    pub leaves_min: u32,
    /// See `leaves_min`.
    pub leaves_extra: u32,
    /// Leaves land within `±scatter/2` of the branch tip.
    pub leaf_scatter: f64,
}

impl Default for BranchParams {
    fn default() -> Self {
        Self {
            depth: 4,
            length: 60.0,
            width: 3.0,
            spread_deg: 70.0,
            fork_threshold: 0.45,
            length_min: 0.65,
            length_range: 0.2,
            width_factor: 0.7,
            leaves_min: 3,
            leaves_extra: 4,
            leaf_scatter: 10.0,
        }
    }
}

/// A drawn branch.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    /// Base of the branch.
    pub start: Point,
    /// Tip of the branch.
    pub end: Point,
    /// Stroke width.
    pub width: f64,
    /// Fork level, `0` for the trunk.
    pub depth: u32,
}

/// A leaf blob at a branch tip.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Leaf {
    /// Centre.
    pub center: Point,
    /// Radius along the major axis.
    pub radius: f64,
}

/// Output of [`grow`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tree {
    /// Branches in generation order.
    pub segments: Vec<Segment>,
    /// Leaves in generation order.
    pub leaves: Vec<Leaf>,
}

impl Tree {
    /// Deepest fork level reached.
    pub fn max_depth(&self) -> u32 {
        self.segments.iter().map(|s| s.depth).max().unwrap_or(0)
    }
}

struct Grower<'a, R> {
    rng: &'a mut R,
    params: BranchParams,
    tree: Tree,
}

/// Grow a tree upwards from `root`.
///
/// Recursion is bounded by depth, so the call terminates for any RNG stream; segment and leaf
/// counts are additionally capped.
pub fn grow<R: Random>(rng: &mut R, root: Point, params: &BranchParams) -> Tree {
    let params = BranchParams {
        depth: params.depth.min(MAX_BRANCH_DEPTH),
        ..*params
    };
    let mut g = Grower {
        rng,
        params,
        tree: Tree::default(),
    };
    g.branch(root, 0.0, params.length, params.depth, params.width, 0);
    g.tree
}

impl<R: Random> Grower<'_, R> {
    /// `heading` is radians clockwise from straight up.
    fn branch(
        &mut self,
        base: Point,
        heading: f64,
        len: f64,
        remaining: u32,
        width: f64,
        level: u32,
    ) {
        if remaining == 0 {
            self.leaves(base, heading, len);
            return;
        }
        if self.tree.segments.len() >= MAX_SEGMENTS {
            return;
        }

        let tip = base + local_to_world(heading, Vec2::new(0.0, -len));
        self.tree.segments.push(Segment {
            start: base,
            end: tip,
            width,
            depth: level,
        });

        let children = if self.rng.next_f64() > self.params.fork_threshold {
            2
        } else {
            3
        };
        for _ in 0..children {
            let turn = self.rng.centered() * self.params.spread_deg.to_radians();
            let factor = self.params.length_min + self.rng.next_f64() * self.params.length_range;
            self.branch(
                tip,
                heading + turn,
                len * factor,
                remaining - 1,
                width * self.params.width_factor,
                level + 1,
            );
        }
    }

    fn leaves(&mut self, base: Point, heading: f64, len: f64) {
        let extra = (self.rng.next_f64() * f64::from(self.params.leaves_extra)) as u32;
        let count = self.params.leaves_min + extra;
        let scatter = self.params.leaf_scatter;
        for _ in 0..count {
            let dx = self.rng.centered() * scatter;
            let dy = -len + self.rng.centered() * scatter;
            let radius = 1.2 + self.rng.next_f64() * 1.5;
            if self.tree.leaves.len() >= MAX_LEAVES {
                continue;
            }
            self.tree.leaves.push(Leaf {
                center: base + local_to_world(heading, Vec2::new(dx, dy)),
                radius,
            });
        }
    }
}

fn local_to_world(heading: f64, v: Vec2) -> Vec2 {
    let (s, c) = heading.sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/lsystem.rs"]
mod tests;
