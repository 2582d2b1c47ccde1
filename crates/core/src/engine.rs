use crate::allocation::blend::final_weights;
use crate::allocation::distribution::distribute;
use crate::allocation::goal::project_goal;
use crate::allocation::optimizer::optimize_three;
use crate::allocation::risk::RiskAssessment;
use crate::allocation::scoring::{select_top, ScoringOptions};
use crate::allocation::{COVARIANCE, EXPECTED_RETURNS};
use crate::domain::input::PlanRequest;
use crate::domain::plan::{AllocationPlan, AllocationPlanEntry, FundedInstrument};
use crate::domain::profile::AssetClass;
use crate::error::ComputationError;
use crate::ingest::PriceHistorySource;
use crate::universe::UniverseOptions;

/// Return and covariance assumptions over [`AssetClass::ALL`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketAssumptions {
    pub expected_returns: [f64; 3],
    pub covariance: [[f64; 3]; 3],
}

impl Default for MarketAssumptions {
    fn default() -> Self {
        Self {
            expected_returns: EXPECTED_RETURNS,
            covariance: COVARIANCE,
        }
    }
}

/// Computes allocation plans against a price-history source.
///
/// Holds no per-request state; every call to [`AllocationEngine::plan`] starts from scratch.
pub struct AllocationEngine<S> {
    source: S,
    universe: UniverseOptions,
    scoring: ScoringOptions,
    assumptions: MarketAssumptions,
}

impl<S: PriceHistorySource> AllocationEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            universe: UniverseOptions::default(),
            scoring: ScoringOptions::default(),
            assumptions: MarketAssumptions::default(),
        }
    }

    pub fn with_universe(mut self, universe: UniverseOptions) -> Self {
        self.universe = universe;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringOptions) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_assumptions(mut self, assumptions: MarketAssumptions) -> Self {
        self.assumptions = assumptions;
        self
    }

    pub async fn plan(&self, request: &PlanRequest) -> Result<AllocationPlan, ComputationError> {
        let risk = match &request.answers {
            Some(answers) => RiskAssessment::from_answers(answers),
            None => RiskAssessment::default(),
        };
        let months = request.horizon.to_months();
        let policy = request.policy;

        let optimizer = optimize_three(
            &self.assumptions.expected_returns,
            &self.assumptions.covariance,
        )?;
        let (weights, alpha) = final_weights(policy, risk.profile, risk.index, &optimizer);
        let amounts = split_capital(request.initial_capital, &weights);

        tracing::info!(
            profile = %risk.profile,
            score = risk.score,
            risk_index = risk.index,
            ?alpha,
            ?policy,
            ?weights,
            "asset-class split computed"
        );

        let entries = AssetClass::ALL
            .iter()
            .zip(weights.iter().zip(amounts.iter()))
            .map(|(class, (w, amount))| AllocationPlanEntry {
                asset_class: *class,
                label: class.label().to_string(),
                weight_pct: round_pct(*w),
                amount: *amount,
            })
            .collect();

        let bonus = policy.score_bonus(risk.profile);
        let growth = self
            .fund_class(AssetClass::Growth, &self.universe.growth, bonus, amounts[0])
            .await;
        let blue_chip = self
            .fund_class(AssetClass::BlueChip, &self.universe.blue_chip, bonus, amounts[1])
            .await;

        let projection = project_goal(
            request.initial_capital,
            request.target_amount,
            months,
            policy.monthly_rate(risk.profile),
        );

        tracing::info!(
            goal = %request.goal,
            months,
            required_monthly = projection.required_monthly_contribution,
            feasible = projection.feasible,
            "goal projected"
        );

        Ok(AllocationPlan {
            goal: request.goal.clone(),
            initial_capital: request.initial_capital,
            target_amount: request.target_amount,
            policy,
            risk_profile: risk.profile,
            risk_score: risk.score,
            risk_index: risk.index,
            alpha,
            entries,
            growth,
            blue_chip,
            projection,
        })
    }

    /// Ranks one equity class and spreads its fund over the winners.
    ///
    /// At least one instrument is kept so a non-empty universe always absorbs the whole fund.
    async fn fund_class(
        &self,
        class: AssetClass,
        codes: &[String],
        bonus: u32,
        fund: i64,
    ) -> Vec<FundedInstrument> {
        let top_n = self.universe.top_n.max(1);
        let top = select_top(&self.source, codes, bonus, top_n, &self.scoring).await;
        tracing::debug!(?class, candidates = codes.len(), selected = top.len(), fund, "class ranked");
        distribute(top, fund)
    }
}

/// Floors each class amount and gives the leftover to the first class.
pub fn split_capital(capital: i64, weights: &[f64; 3]) -> [i64; 3] {
    let mut out = [0i64; 3];
    for (slot, w) in out.iter_mut().zip(weights) {
        *slot = (capital as f64 * w).floor() as i64;
    }
    let assigned: i64 = out.iter().sum();
    out[0] += capital - assigned;
    out
}

fn round_pct(w: f64) -> f64 {
    (w * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::input::Horizon;
    use crate::domain::plan::AllocationPolicy;
    use crate::domain::profile::{RiskProfile, Trend};
    use crate::ingest::StaticPriceHistory;
    use chrono::NaiveDate;

    fn step_series(old: f64, recent: f64) -> Vec<f64> {
        let mut v = vec![old; 40];
        v.extend(std::iter::repeat(recent).take(20));
        v
    }

    fn fixture_engine() -> AllocationEngine<StaticPriceHistory> {
        let last = NaiveDate::from_ymd_opt(2026, 1, 27).unwrap();
        let source = StaticPriceHistory::new()
            .with_closes("G1.JK", last, &step_series(100.0, 90.0))
            .with_closes("G2.JK", last, &step_series(1000.0, 1100.0))
            .with_closes("G3.JK", last, &vec![500.0; 60])
            .with_closes("G4.JK", last, &step_series(200.0, 230.0))
            .with_closes("B1.JK", last, &[9000.0; 30]);

        let universe = UniverseOptions {
            growth: ["G1.JK", "G2.JK", "G3.JK", "G4.JK"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            blue_chip: ["B1.JK", "B2.JK"].iter().map(|s| s.to_string()).collect(),
            top_n: 3,
        };

        AllocationEngine::new(source).with_universe(universe)
    }

    fn request(answers: Option<Vec<i64>>, policy: AllocationPolicy) -> PlanRequest {
        PlanRequest {
            goal: "House down payment".to_string(),
            initial_capital: 10_000_000,
            target_amount: 50_000_000,
            horizon: Horizon::years(1),
            answers,
            policy,
        }
    }

    #[tokio::test]
    async fn hybrid_plan_for_moderate_client() {
        let engine = fixture_engine();
        let plan = engine
            .plan(&request(Some(vec![3, 3, 2, 2, 2, 2, 2, 2]), AllocationPolicy::HybridBlend))
            .await
            .unwrap();

        assert_eq!(plan.risk_profile, RiskProfile::Moderate);
        assert_eq!(plan.risk_score, 18);
        assert!((plan.alpha.unwrap() - 0.575).abs() < 1e-12);

        let amounts: Vec<i64> = plan.entries.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, [4_032_694, 2_869_230, 3_098_076]);
        assert_eq!(amounts.iter().sum::<i64>(), 10_000_000);
        let pcts: Vec<f64> = plan.entries.iter().map(|e| e.weight_pct).collect();
        assert_eq!(pcts, [40.3, 28.7, 31.0]);

        let growth: Vec<(&str, u32)> = plan
            .growth
            .iter()
            .map(|f| (f.candidate.code.as_str(), f.candidate.score))
            .collect();
        assert_eq!(growth, [("G2", 3), ("G4", 3), ("G3", 2)]);
        let growth_alloc: Vec<i64> = plan.growth.iter().map(|f| f.allocation).collect();
        assert_eq!(growth_alloc, [1_512_261, 1_512_260, 1_008_173]);
        assert_eq!(plan.growth[0].candidate.last_price, 1100);

        // Short history and missing history both land on the neutral tier.
        assert_eq!(plan.blue_chip.len(), 2);
        assert!(plan
            .blue_chip
            .iter()
            .all(|f| f.candidate.trend == Trend::Sideways && f.candidate.score == 1));
        let blue_alloc: Vec<i64> = plan.blue_chip.iter().map(|f| f.allocation).collect();
        assert_eq!(blue_alloc, [1_434_615, 1_434_615]);

        assert_eq!(plan.projection.required_monthly_contribution, 3_333_333);
        assert_eq!(plan.projection.monthly_rate, 0.015);
        assert!(plan.projection.feasible);
    }

    #[tokio::test]
    async fn missing_answers_default_to_moderate() {
        let plan = fixture_engine()
            .plan(&request(None, AllocationPolicy::HybridBlend))
            .await
            .unwrap();
        assert_eq!(plan.risk_profile, RiskProfile::Moderate);
        assert_eq!(plan.risk_score, 18);
    }

    #[tokio::test]
    async fn direct_policy_uses_optimizer_rate_and_bonus() {
        let plan = fixture_engine()
            .plan(&request(Some(vec![3; 8]), AllocationPolicy::DirectOptimizer))
            .await
            .unwrap();

        assert_eq!(plan.risk_profile, RiskProfile::Aggressive);
        assert_eq!(plan.alpha, None);
        let json = serde_json::to_value(&plan).unwrap();
        assert!(json["alpha"].is_null());
        assert_eq!(plan.projection.monthly_rate, 0.03);
        assert_eq!(plan.entry(AssetClass::Growth).unwrap().weight_pct, 40.8);
        assert_eq!(plan.entry(AssetClass::Bond).unwrap().weight_pct, 32.3);
        assert_eq!(plan.entries.iter().map(|e| e.amount).sum::<i64>(), 10_000_000);

        let scores: Vec<u32> = plan.growth.iter().map(|f| f.candidate.score).collect();
        assert_eq!(scores, [5, 5, 4]);
        assert!(plan.blue_chip.iter().all(|f| f.candidate.score == 3));
    }

    #[tokio::test]
    async fn singular_covariance_fails_the_request() {
        let engine = fixture_engine().with_assumptions(MarketAssumptions {
            expected_returns: EXPECTED_RETURNS,
            covariance: [[0.04, 0.04, 0.0], [0.04, 0.04, 0.0], [0.0, 0.0, 0.02]],
        });
        let err = engine
            .plan(&request(None, AllocationPolicy::HybridBlend))
            .await
            .unwrap_err();
        assert!(matches!(err, ComputationError::SingularMatrix { .. }));
    }

    #[tokio::test]
    async fn identical_requests_serialize_identically() {
        let engine = fixture_engine();
        let req = request(Some(vec![2, 3, 2, 3, 2, 3, 2, 3]), AllocationPolicy::HybridBlend);
        let a = serde_json::to_string(&engine.plan(&req).await.unwrap()).unwrap();
        let b = serde_json::to_string(&engine.plan(&req).await.unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn zero_capital_funds_nothing() {
        let mut req = request(None, AllocationPolicy::HybridBlend);
        req.initial_capital = 0;
        let plan = fixture_engine().plan(&req).await.unwrap();
        assert!(plan.entries.iter().all(|e| e.amount == 0));
        assert!(plan.growth.iter().all(|f| f.allocation == 0));
        assert_eq!(plan.projection.required_monthly_contribution, 4_166_666);
    }

    #[tokio::test]
    async fn zero_top_n_still_funds_each_class() {
        let mut engine = fixture_engine();
        engine.universe.top_n = 0;
        let plan = engine
            .plan(&request(None, AllocationPolicy::HybridBlend))
            .await
            .unwrap();

        assert_eq!(plan.growth.len(), 1);
        assert_eq!(plan.growth[0].candidate.code, "G2");
        assert_eq!(plan.blue_chip.len(), 1);
        for (class, funded) in [
            (AssetClass::Growth, &plan.growth),
            (AssetClass::BlueChip, &plan.blue_chip),
        ] {
            let amount = plan.entry(class).unwrap().amount;
            assert_eq!(funded.iter().map(|f| f.allocation).sum::<i64>(), amount);
        }
    }

    #[test]
    fn split_capital_is_exact() {
        let w = [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0];
        let out = split_capital(100, &w);
        assert_eq!(out.iter().sum::<i64>(), 100);
        assert_eq!(out[0], 34);
    }

    #[test]
    fn percentages_round_to_one_decimal() {
        assert_eq!(round_pct(0.40326923), 40.3);
        assert_eq!(round_pct(0.30980769), 31.0);
        assert_eq!(round_pct(0.0), 0.0);
    }
}
