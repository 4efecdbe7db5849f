//! Tone mapping selection
//!
//! The composed scene only names the curve; the consuming renderer owns the
//! shader side.

use serde::{Deserialize, Serialize};

/// HDR → display curve applied after lighting.
///
/// Both jewelry views use [`ACESFilmic`](ToneMappingMode::ACESFilmic): it
/// keeps the specular peaks on gold and gem facets from clipping to flat white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToneMappingMode {
    /// Pass-through, for inspecting raw radiance.
    Linear,
    Neutral,
    Reinhard,
    Cineon,
    #[default]
    ACESFilmic,
    AgX,
}

impl ToneMappingMode {
    pub const ALL: [ToneMappingMode; 6] = [
        Self::Linear,
        Self::Neutral,
        Self::Reinhard,
        Self::Cineon,
        Self::ACESFilmic,
        Self::AgX,
    ];

    /// Display label, e.g. for a settings dump.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::Neutral => "Neutral",
            Self::Reinhard => "Reinhard",
            Self::Cineon => "Cineon",
            Self::ACESFilmic => "ACES Filmic",
            Self::AgX => "AgX",
        }
    }
}

impl std::fmt::Display for ToneMappingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
