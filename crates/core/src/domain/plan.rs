use crate::domain::profile::{AssetClass, RiskProfile, Trend};
use serde::{Deserialize, Serialize};

/// How the asset-class split, trend scores and projected growth rate are derived.
///
/// The two strategies are never mixed within one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationPolicy {
    /// Profile anchor blended with optimizer weights; flat 1.5% monthly rate; no score bonus.
    #[default]
    HybridBlend,
    /// Optimizer weights used as-is; profile-keyed monthly rate; profile score bonus.
    DirectOptimizer,
}

/// Flat monthly rate assumed by [`AllocationPolicy::HybridBlend`].
pub const HYBRID_MONTHLY_RATE: f64 = 0.015;

impl AllocationPolicy {
    pub fn monthly_rate(self, profile: RiskProfile) -> f64 {
        match self {
            AllocationPolicy::HybridBlend => HYBRID_MONTHLY_RATE,
            AllocationPolicy::DirectOptimizer => profile.monthly_rate(),
        }
    }

    pub fn score_bonus(self, profile: RiskProfile) -> u32 {
        match self {
            AllocationPolicy::HybridBlend => 0,
            AllocationPolicy::DirectOptimizer => profile.score_bonus(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentCandidate {
    pub code: String,
    pub trend: Trend,
    pub last_price: i64,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundedInstrument {
    #[serde(flatten)]
    pub candidate: InstrumentCandidate,
    pub allocation: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlanEntry {
    pub asset_class: AssetClass,
    pub label: String,
    /// Percentage rounded to one decimal place.
    pub weight_pct: f64,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProjection {
    pub required_monthly_contribution: i64,
    pub projected_future_value: f64,
    pub feasible: bool,
    pub monthly_rate: f64,
    pub months: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub goal: String,
    pub initial_capital: i64,
    pub target_amount: i64,
    pub policy: AllocationPolicy,
    pub risk_profile: RiskProfile,
    pub risk_score: i64,
    pub risk_index: f64,
    /// Anchor weight of the blend; `None` when the optimizer split is used as-is.
    pub alpha: Option<f64>,
    pub entries: Vec<AllocationPlanEntry>,
    pub growth: Vec<FundedInstrument>,
    pub blue_chip: Vec<FundedInstrument>,
    pub projection: GoalProjection,
}

impl AllocationPlan {
    pub fn entry(&self, class: AssetClass) -> Option<&AllocationPlanEntry> {
        self.entries.iter().find(|e| e.asset_class == class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn policy_keys_rate_and_bonus() {
        let hybrid = AllocationPolicy::HybridBlend;
        let direct = AllocationPolicy::DirectOptimizer;
        assert_eq!(hybrid.monthly_rate(RiskProfile::Aggressive), 0.015);
        assert_eq!(hybrid.score_bonus(RiskProfile::Aggressive), 0);
        assert_eq!(direct.monthly_rate(RiskProfile::Conservative), 0.008);
        assert_eq!(direct.monthly_rate(RiskProfile::Aggressive), 0.03);
        assert_eq!(direct.score_bonus(RiskProfile::Moderate), 1);
        assert_eq!(AllocationPolicy::default(), hybrid);
    }

    #[test]
    fn funded_instrument_flattens_candidate() {
        let f = FundedInstrument {
            candidate: InstrumentCandidate {
                code: "BBCA".to_string(),
                trend: Trend::Uptrend,
                last_price: 9875,
                score: 3,
            },
            allocation: 51,
        };
        let v = serde_json::to_value(&f).unwrap();
        assert_eq!(
            v,
            json!({
                "code": "BBCA",
                "trend": "Uptrend",
                "last_price": 9875,
                "score": 3,
                "allocation": 51,
            })
        );
    }
}
