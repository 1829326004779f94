use crate::foundation::core::{Point3, Rect, Vec2};
use crate::foundation::error::{SceneError, SceneResult};
use crate::foundation::math::{Fingerprint, StableHasher};
use crate::layout::lsystem::Tree;
use crate::theme::color::Color;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Closed set of scene kinds.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum SceneKind {
    /// Isometric voxel island.
    Voxel,
    /// Twin planetary systems around a Fibonacci-sphere core.
    Orbital,
    /// L-system forest on a perspective ground plane.
    FractalForest,
    /// Drifting deformable blobs.
    MetaballField,
    /// Looping city drive seen through a window.
    ParallaxWindow,
    /// Static Memphis-style subdivided tiles.
    TiledPattern,
}

impl SceneKind {
    /// Every kind, in registry order.
    pub const ALL: [SceneKind; 6] = [
        SceneKind::Voxel,
        SceneKind::Orbital,
        SceneKind::FractalForest,
        SceneKind::MetaballField,
        SceneKind::ParallaxWindow,
        SceneKind::TiledPattern,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            SceneKind::Voxel => "voxel",
            SceneKind::Orbital => "orbital",
            SceneKind::FractalForest => "fractalForest",
            SceneKind::MetaballField => "metaballField",
            SceneKind::ParallaxWindow => "parallaxWindow",
            SceneKind::TiledPattern => "tiledPattern",
        }
    }
}

impl std::fmt::Display for SceneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneKind {
    type Err = SceneError;

    fn from_str(s: &str) -> SceneResult<Self> {
        SceneKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SceneError::unsupported_kind(s))
    }
}

/// Fill shape of a tiled cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TileShape {
    /// Solid rectangle.
    Block,
    /// Rows of zigzag strokes.
    Zigzag,
    /// Sine-wave strokes along the long side.
    Squiggle,
    /// Right triangle filling one half.
    Triangle,
    /// Quarter disc anchored in a corner.
    QuarterCircle,
    /// Diagonal stripes.
    Stripes,
    /// Dot grid.
    Dots,
}

impl TileShape {
    /// Selection order.
    pub const ALL: [TileShape; 7] = [
        TileShape::Block,
        TileShape::Zigzag,
        TileShape::Squiggle,
        TileShape::Triangle,
        TileShape::QuarterCircle,
        TileShape::Stripes,
        TileShape::Dots,
    ];
}

/// Role of a voxel column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    /// Island terrain.
    Ground,
    /// The single tall landmark.
    Hero,
    /// Small decoration on top of terrain.
    Prop,
}

/// Skyline silhouette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuildingStyle {
    /// Stepped crown.
    Stepped,
    /// Tapered trapezoid.
    Tapered,
    /// Mast with a sphere on top.
    Ball,
    /// Plain block.
    Flat,
    /// Plain block with a glass sheen.
    Glass,
}

impl BuildingStyle {
    /// Selection order.
    pub const ALL: [BuildingStyle; 5] = [
        BuildingStyle::Stepped,
        BuildingStyle::Tapered,
        BuildingStyle::Ball,
        BuildingStyle::Flat,
        BuildingStyle::Glass,
    ];
}

/// Typed payload of an entity.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EntityKind {
    /// Subdivided tile.
    Cell {
        /// Fill shape.
        shape: TileShape,
        /// Orientation for corner-anchored shapes, `0..4`.
        corner: u8,
    },
    /// Voxel column.
    Voxel {
        /// Role.
        block: BlockKind,
        /// Column height in blocks.
        height: u32,
    },
    /// Background star.
    Star,
    /// Centre of a planetary system.
    Sun,
    /// Orbiting planet.
    Planet {
        /// Owning system index.
        system: u8,
        /// Index within the system (colour and spin direction).
        index: u8,
        /// Orbit radius.
        distance: f64,
        /// Angular speed in radians per second (signed).
        spin: f64,
    },
    /// Point on the core sphere (position is a unit vector).
    SpherePoint,
    /// Branching tree grown in world space.
    Tree {
        /// Branches and leaves.
        growth: Tree,
    },
    /// Low bush (stems and leaves).
    Bush {
        /// Stems and leaves.
        growth: Tree,
    },
    /// Ground flower.
    Flower {
        /// Petal count.
        petals: u8,
        /// Index into the brand accents.
        hue: u8,
    },
    /// Tuft of grass where a plant did not bloom.
    Grass {
        /// Blade count.
        blades: u8,
    },
    /// Deformable blob.
    Blob {
        /// Radius multipliers of the 12 outline lobes.
        lobes: [f64; 12],
    },
    /// Skyline building.
    Building {
        /// Silhouette.
        style: BuildingStyle,
        /// Warm (amber) windows instead of cool white.
        warm: bool,
    },
    /// Track support post.
    TrackPost {
        /// Carries a pillar.
        pillar: bool,
        /// Carries a lamp.
        light: bool,
    },
    /// Bridge pylon.
    Pylon {
        /// Taller tower section.
        tower: bool,
    },
}

impl EntityKind {
    /// Short label used in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Cell { .. } => "cell",
            EntityKind::Voxel { .. } => "voxel",
            EntityKind::Star => "star",
            EntityKind::Sun => "sun",
            EntityKind::Planet { .. } => "planet",
            EntityKind::SpherePoint => "spherePoint",
            EntityKind::Tree { .. } => "tree",
            EntityKind::Bush { .. } => "bush",
            EntityKind::Flower { .. } => "flower",
            EntityKind::Grass { .. } => "grass",
            EntityKind::Blob { .. } => "blob",
            EntityKind::Building { .. } => "building",
            EntityKind::TrackPost { .. } => "trackPost",
            EntityKind::Pylon { .. } => "pylon",
        }
    }
}

/// Animation parameters fixed at generation time.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Motion {
    /// Drift in world units per second.
    pub velocity: Vec2,
    /// Phase offset in radians.
    pub phase: f64,
}

/// One static element of a world.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Typed payload.
    pub kind: EntityKind,
    /// World position; `z` is depth.
    pub position: Point3,
    /// Width and height (or radius in `x` for round entities).
    pub extent: Vec2,
    /// Seed of the entity's private random stream.
    pub style_seed: u32,
    /// Animation parameters.
    pub motion: Motion,
}

impl Entity {
    /// Entity without motion.
    pub fn fixed(kind: EntityKind, position: Point3, extent: Vec2, style_seed: u32) -> Self {
        Self {
            kind,
            position,
            extent,
            style_seed,
            motion: Motion::default(),
        }
    }

    /// Attach motion.
    pub fn with_motion(mut self, velocity: Vec2, phase: f64) -> Self {
        self.motion = Motion { velocity, phase };
        self
    }
}

/// Sky treatment of the forest family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkyStyle {
    /// Dark top fading through both accents to the primary at the horizon.
    Sunset,
    /// Black fading to a faint primary.
    Digital,
    /// Almost black.
    Monochrome,
}

/// Ground treatment of the forest family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroundStyle {
    /// Near-black.
    Dark,
    /// Faint primary tint.
    Tinted,
    /// Tinted at the horizon fading to black.
    Gradient,
}

/// Per-world scalar choices that are not entities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorldStyle {
    /// Nothing beyond theme and entities.
    #[default]
    Plain,
    /// Forest background rolls.
    Forest {
        /// Sky treatment.
        sky: SkyStyle,
        /// Ground treatment.
        ground: GroundStyle,
        /// Main foliage and horizon colour.
        primary: Color,
        /// Second sunset colour.
        secondary: Color,
    },
}

/// Static output of generation for one `(seed, kind, config)`. Read-only after generation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldDescription {
    /// Scene kind that produced the world.
    pub kind: SceneKind,
    /// World-space frame the recipe laid entities out in.
    pub bounds: Rect,
    /// Loop length for horizontally wrapping worlds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world_length: Option<f64>,
    /// Background rolls.
    pub style: WorldStyle,
    /// Entities in draw order.
    pub entities: Vec<Entity>,
}

/// Compact description used by logs and the CLI.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSummary {
    /// Scene kind.
    pub kind: SceneKind,
    /// Total entity count.
    pub entities: usize,
    /// Entity count per label.
    pub counts: BTreeMap<&'static str, usize>,
    /// Content fingerprint.
    pub fingerprint: String,
}

impl WorldDescription {
    /// Empty world for `kind` in `bounds`.
    pub fn new(kind: SceneKind, bounds: Rect) -> Self {
        Self {
            kind,
            bounds,
            world_length: None,
            style: WorldStyle::Plain,
            entities: Vec::new(),
        }
    }

    /// Number of entities matching `pred`.
    pub fn count(&self, pred: impl Fn(&EntityKind) -> bool) -> usize {
        self.entities.iter().filter(|e| pred(&e.kind)).count()
    }

    /// Summary with per-label counts.
    pub fn summary(&self) -> WorldSummary {
        let mut counts = BTreeMap::new();
        for e in &self.entities {
            *counts.entry(e.kind.label()).or_insert(0usize) += 1;
        }
        WorldSummary {
            kind: self.kind,
            entities: self.entities.len(),
            counts,
            fingerprint: self.fingerprint().to_string(),
        }
    }

    /// Stable content fingerprint. Bit-identical worlds have identical fingerprints.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut h = StableHasher::new();
        h.write_str(self.kind.as_str());
        for v in [self.bounds.x0, self.bounds.y0, self.bounds.x1, self.bounds.y1] {
            h.write_f64(v);
        }
        match self.world_length {
            Some(l) => {
                h.write_u8(1);
                h.write_f64(l);
            }
            None => h.write_u8(0),
        }
        match self.style {
            WorldStyle::Plain => h.write_u8(0),
            WorldStyle::Forest {
                sky,
                ground,
                primary,
                secondary,
            } => {
                h.write_u8(1);
                h.write_u8(sky as u8);
                h.write_u8(ground as u8);
                for c in [primary, secondary] {
                    h.write_bytes(&[c.r, c.g, c.b, c.a]);
                }
            }
        }
        h.write_u64(self.entities.len() as u64);
        for e in &self.entities {
            hash_entity(&mut h, e);
        }
        h.finish()
    }
}

fn hash_entity(h: &mut StableHasher, e: &Entity) {
    h.write_str(e.kind.label());
    match &e.kind {
        EntityKind::Cell { shape, corner } => {
            h.write_u8(*shape as u8);
            h.write_u8(*corner);
        }
        EntityKind::Voxel { block, height } => {
            h.write_u8(*block as u8);
            h.write_u32(*height);
        }
        EntityKind::Star | EntityKind::Sun | EntityKind::SpherePoint => {}
        EntityKind::Planet {
            system,
            index,
            distance,
            spin,
        } => {
            h.write_u8(*system);
            h.write_u8(*index);
            h.write_f64(*distance);
            h.write_f64(*spin);
        }
        EntityKind::Tree { growth } | EntityKind::Bush { growth } => hash_tree(h, growth),
        EntityKind::Flower { petals, hue } => {
            h.write_u8(*petals);
            h.write_u8(*hue);
        }
        EntityKind::Grass { blades } => h.write_u8(*blades),
        EntityKind::Blob { lobes } => {
            for l in lobes {
                h.write_f64(*l);
            }
        }
        EntityKind::Building { style, warm } => {
            h.write_u8(*style as u8);
            h.write_bool(*warm);
        }
        EntityKind::TrackPost { pillar, light } => {
            h.write_bool(*pillar);
            h.write_bool(*light);
        }
        EntityKind::Pylon { tower } => h.write_bool(*tower),
    }
    for v in [
        e.position.x,
        e.position.y,
        e.position.z,
        e.extent.x,
        e.extent.y,
        e.motion.velocity.x,
        e.motion.velocity.y,
        e.motion.phase,
    ] {
        h.write_f64(v);
    }
    h.write_u32(e.style_seed);
}

fn hash_tree(h: &mut StableHasher, tree: &Tree) {
    h.write_u64(tree.segments.len() as u64);
    for s in &tree.segments {
        for v in [s.start.x, s.start.y, s.end.x, s.end.y, s.width] {
            h.write_f64(v);
        }
        h.write_u32(s.depth);
    }
    h.write_u64(tree.leaves.len() as u64);
    for l in &tree.leaves {
        h.write_f64(l.center.x);
        h.write_f64(l.center.y);
        h.write_f64(l.radius);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
