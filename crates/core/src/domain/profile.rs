use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskProfile {
    /// Class split favored by the profile, ordered as [`AssetClass::ALL`].
    pub fn anchor_weights(self) -> [f64; 3] {
        match self {
            RiskProfile::Conservative => [0.25, 0.30, 0.45],
            RiskProfile::Moderate => [0.40, 0.30, 0.30],
            RiskProfile::Aggressive => [0.60, 0.25, 0.15],
        }
    }

    /// Ordinal bonus added to trend scores when the profile-aware policy is active.
    pub fn score_bonus(self) -> u32 {
        match self {
            RiskProfile::Conservative => 0,
            RiskProfile::Moderate => 1,
            RiskProfile::Aggressive => 2,
        }
    }

    /// Assumed monthly growth rate for the profile-keyed goal projection.
    pub fn monthly_rate(self) -> f64 {
        match self {
            RiskProfile::Conservative => 0.008,
            RiskProfile::Moderate => 0.015,
            RiskProfile::Aggressive => 0.03,
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskProfile::Conservative => "Conservative",
            RiskProfile::Moderate => "Moderate",
            RiskProfile::Aggressive => "Aggressive",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    Growth,
    BlueChip,
    Bond,
}

impl AssetClass {
    /// Fixed ordering shared by every weight vector in the engine.
    pub const ALL: [AssetClass; 3] = [AssetClass::Growth, AssetClass::BlueChip, AssetClass::Bond];

    pub fn label(self) -> &'static str {
        match self {
            AssetClass::Growth => "Growth Equities",
            AssetClass::BlueChip => "Blue Chip Equities",
            AssetClass::Bond => "Bonds",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Uptrend,
    Sideways,
    Downtrend,
}

impl Trend {
    pub fn base_score(self) -> u32 {
        match self {
            Trend::Uptrend => 3,
            Trend::Sideways => 2,
            Trend::Downtrend => 1,
        }
    }
}
