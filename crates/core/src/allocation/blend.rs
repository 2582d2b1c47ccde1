use crate::domain::plan::AllocationPolicy;
use crate::domain::profile::RiskProfile;

pub const ALPHA_MAX: f64 = 0.7;
pub const ALPHA_MIN: f64 = 0.5;
const ALPHA_SLOPE: f64 = 0.2;

/// Weight given to the profile anchor; falls linearly as risk tolerance rises.
pub fn alpha(risk_index: f64) -> f64 {
    (ALPHA_MAX - ALPHA_SLOPE * risk_index).clamp(ALPHA_MIN, ALPHA_MAX)
}

/// `normalize(α·anchor + (1 − α)·optimizer)`.
pub fn blend(profile: RiskProfile, risk_index: f64, optimizer: &[f64; 3]) -> [f64; 3] {
    let a = alpha(risk_index);
    let anchor = profile.anchor_weights();

    let mut out = [0.0; 3];
    for (slot, (anchor_w, opt_w)) in out.iter_mut().zip(anchor.iter().zip(optimizer)) {
        *slot = a * anchor_w + (1.0 - a) * opt_w;
    }

    let sum: f64 = out.iter().sum();
    if sum > 0.0 {
        for w in out.iter_mut() {
            *w /= sum;
        }
    }
    out
}

/// Final class split under the given policy, with the alpha that produced it.
///
/// `DirectOptimizer` ignores the anchor entirely, so no alpha is reported.
pub fn final_weights(
    policy: AllocationPolicy,
    profile: RiskProfile,
    risk_index: f64,
    optimizer: &[f64; 3],
) -> ([f64; 3], Option<f64>) {
    match policy {
        AllocationPolicy::HybridBlend => (
            blend(profile, risk_index, optimizer),
            Some(alpha(risk_index)),
        ),
        AllocationPolicy::DirectOptimizer => (*optimizer, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::WEIGHT_TOLERANCE;

    const OPT: [f64; 3] = [53.0 / 130.0, 35.0 / 130.0, 42.0 / 130.0];

    #[test]
    fn alpha_bounds_and_reference_point() {
        assert_eq!(alpha(0.0), 0.7);
        assert_eq!(alpha(1.0), 0.5);
        assert!((alpha(0.125) - 0.675).abs() < 1e-12);
        for i in 0..=100 {
            let a = alpha(i as f64 / 100.0);
            assert!((ALPHA_MIN..=ALPHA_MAX).contains(&a), "{a}");
        }
    }

    #[test]
    fn alpha_decreases_with_risk() {
        let mut prev = alpha(0.0);
        for i in 1..=20 {
            let a = alpha(i as f64 / 20.0);
            assert!(a <= prev);
            prev = a;
        }
    }

    #[test]
    fn blended_weights_stay_on_simplex() {
        for profile in [
            RiskProfile::Conservative,
            RiskProfile::Moderate,
            RiskProfile::Aggressive,
        ] {
            for i in 0..=16 {
                let w = blend(profile, i as f64 / 16.0, &OPT);
                assert!(w.iter().all(|x| *x >= 0.0));
                let sum: f64 = w.iter().sum();
                assert!((sum - 1.0).abs() < WEIGHT_TOLERANCE);
            }
        }
    }

    #[test]
    fn conservative_at_zero_risk_leans_on_anchor() {
        let w = blend(RiskProfile::Conservative, 0.0, &OPT);
        let expected = [
            0.7 * 0.25 + 0.3 * OPT[0],
            0.7 * 0.30 + 0.3 * OPT[1],
            0.7 * 0.45 + 0.3 * OPT[2],
        ];
        for (got, want) in w.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn direct_policy_passes_optimizer_through() {
        let (w, a) = final_weights(
            AllocationPolicy::DirectOptimizer,
            RiskProfile::Aggressive,
            1.0,
            &OPT,
        );
        assert_eq!(w, OPT);
        assert_eq!(a, None);
    }

    #[test]
    fn hybrid_policy_reports_alpha_in_range() {
        let (_, a) = final_weights(
            AllocationPolicy::HybridBlend,
            RiskProfile::Moderate,
            0.625,
            &OPT,
        );
        let a = a.unwrap();
        assert!((a - 0.575).abs() < 1e-12);
        assert!((ALPHA_MIN..=ALPHA_MAX).contains(&a));
    }
}
