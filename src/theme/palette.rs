use crate::rng::Random;
use crate::theme::color::Color;
use smallvec::SmallVec;

/// Number of RNG draws [`derive_theme`] consumes, independent of the theme it picks.
pub const THEME_RNG_DRAWS: u64 = 4;

/// Brand colours shared by every theme.
pub mod brand {
    use super::Color;

    /// Mint.
    pub const MINT: Color = Color::hex(0x7FFFD4);
    /// Ion blue.
    pub const BLUE: Color = Color::hex(0x1B82FF);
    /// Purple.
    pub const PURPLE: Color = Color::hex(0x5A3FFF);
    /// Pink.
    pub const PINK: Color = Color::hex(0xFF5C8A);
    /// Orange.
    pub const ORANGE: Color = Color::hex(0xFF914D);
    /// Periwinkle.
    pub const PERIWINKLE: Color = Color::hex(0xA7B6FF);
    /// Aurora.
    pub const AURORA: Color = Color::hex(0x7FDBFF);
    /// Nebula.
    pub const NEBULA: Color = Color::hex(0xFFB7D5);
    /// Near-black background.
    pub const VOID: Color = Color::hex(0x020205);

    /// Accent rotation order.
    pub const ACCENTS: [Color; 6] = [MINT, PINK, PURPLE, BLUE, ORANGE, NEBULA];
}

/// Closed set of theme families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeFamily {
    /// Pale sky over mint ground.
    MintShard,
    /// Black sky, ion blue structures.
    CyberNight,
    /// Dark red sky, orange structures.
    SolarFlare,
    /// Violet sky, periwinkle structures.
    NebulaDream,
    /// Black-pink sky, pink structures.
    NeonCore,
}

impl ThemeFamily {
    /// All families in selection order.
    pub const ALL: [ThemeFamily; 5] = [
        ThemeFamily::MintShard,
        ThemeFamily::CyberNight,
        ThemeFamily::SolarFlare,
        ThemeFamily::NebulaDream,
        ThemeFamily::NeonCore,
    ];

    fn swatch(self) -> Swatch {
        match self {
            ThemeFamily::MintShard => Swatch {
                top: brand::MINT,
                side: Color::hex(0x2E8B57),
                sky_top: Color::hex(0xE0F7FA),
                sky_bottom: brand::MINT,
                glow: brand::MINT,
            },
            ThemeFamily::CyberNight => Swatch {
                top: brand::BLUE,
                side: Color::hex(0x0D47A1),
                sky_top: Color::hex(0x000000),
                sky_bottom: Color::hex(0x001020),
                glow: brand::PURPLE,
            },
            ThemeFamily::SolarFlare => Swatch {
                top: brand::ORANGE,
                side: Color::hex(0xBF360C),
                sky_top: Color::hex(0x210505),
                sky_bottom: brand::ORANGE,
                glow: brand::PINK,
            },
            ThemeFamily::NebulaDream => Swatch {
                top: brand::PERIWINKLE,
                side: brand::PURPLE,
                sky_top: Color::hex(0x120521),
                sky_bottom: brand::PERIWINKLE,
                glow: brand::NEBULA,
            },
            ThemeFamily::NeonCore => Swatch {
                top: brand::PINK,
                side: Color::hex(0x880E4F),
                sky_top: Color::hex(0x1A050D),
                sky_bottom: brand::PINK,
                glow: brand::AURORA,
            },
        }
    }
}

struct Swatch {
    top: Color,
    side: Color,
    sky_top: Color,
    sky_bottom: Color,
    glow: Color,
}

/// Named colour roles used by scene draw routines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeRoles {
    /// Top stop of the background.
    pub sky_top: Color,
    /// Bottom stop of the background.
    pub sky_bottom: Color,
    /// Lit face of structures.
    pub structure_base: Color,
    /// Shadowed face of structures.
    pub structure_side: Color,
    /// Primary accent.
    pub accent: Color,
    /// Emissive highlight.
    pub glow: Color,
}

/// Derived palette for one scene instance. Immutable once derived.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Family the theme was drawn from.
    pub family: ThemeFamily,
    /// Background gradient stops, top to bottom (2 or 3).
    pub sky: SmallVec<[Color; 3]>,
    /// Ordered accent colours (1 to 6).
    pub accents: SmallVec<[Color; 6]>,
    /// Semantic role mapping.
    pub roles: ThemeRoles,
}

impl Theme {
    /// Accent `i`, cycling through the list.
    pub fn accent(&self, i: usize) -> Color {
        if self.accents.is_empty() {
            return self.roles.accent;
        }
        self.accents[i % self.accents.len()]
    }

    /// Copy with `accent` and `glow` replaced by `color`. Structure and sky roles are kept.
    pub fn with_override(&self, color: Option<Color>) -> Theme {
        let Some(color) = color else {
            return self.clone();
        };
        let mut out = self.clone();
        out.roles.accent = color;
        out.roles.glow = color;
        if let Some(first) = out.accents.first_mut() {
            *first = color;
        }
        out
    }

    /// Background stops with evenly spaced offsets in `[0, 1]`.
    pub fn sky_stops(&self) -> impl Iterator<Item = (f64, Color)> + '_ {
        let last = self.sky.len().saturating_sub(1).max(1) as f64;
        self.sky
            .iter()
            .enumerate()
            .map(move |(i, c)| (i as f64 / last, *c))
    }
}

/// Derive a theme. Consumes exactly [`THEME_RNG_DRAWS`] draws in the order:
/// family, sky stop count, accent count, accent rotation.
pub fn derive_theme(rng: &mut impl Random) -> Theme {
    let family = ThemeFamily::ALL[rng.below(ThemeFamily::ALL.len())];
    let sky_stops = 2 + rng.below(2);
    let accent_count = 1 + rng.below(brand::ACCENTS.len());
    let rotation = rng.below(brand::ACCENTS.len());

    let swatch = family.swatch();

    let mut sky = SmallVec::<[Color; 3]>::new();
    sky.push(swatch.sky_top);
    if sky_stops == 3 {
        sky.push(swatch.sky_top.mix(swatch.glow, 0.35));
    }
    sky.push(swatch.sky_bottom);

    let accents: SmallVec<[Color; 6]> = (0..accent_count)
        .map(|i| brand::ACCENTS[(rotation + i) % brand::ACCENTS.len()])
        .collect();

    let roles = ThemeRoles {
        sky_top: swatch.sky_top,
        sky_bottom: swatch.sky_bottom,
        structure_base: swatch.top,
        structure_side: swatch.side,
        accent: accents[0],
        glow: swatch.glow,
    };

    tracing::trace!(?family, sky_stops, accent_count, rotation, "derived theme");

    Theme {
        family,
        sky,
        accents,
        roles,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/theme/palette.rs"]
mod tests;
