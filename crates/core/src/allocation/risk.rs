use crate::domain::profile::RiskProfile;
use serde::{Deserialize, Serialize};

pub const QUESTION_COUNT: usize = 8;
pub const SCORE_MIN: i64 = 8;
pub const SCORE_MAX: i64 = 24;

/// Score assumed when the questionnaire was never answered.
pub const DEFAULT_RISK_SCORE: i64 = 18;

const CONSERVATIVE_MAX: i64 = 14;
const MODERATE_MAX: i64 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub profile: RiskProfile,
    pub score: i64,
    /// Score rescaled onto [0, 1], clamped.
    pub index: f64,
}

impl RiskAssessment {
    /// Sums the first eight answers; missing answers count as zero.
    pub fn from_answers(answers: &[i64]) -> Self {
        let score = answers
            .iter()
            .take(QUESTION_COUNT)
            .fold(0i64, |acc, a| acc.saturating_add(*a));
        Self::from_score(score)
    }

    pub fn from_score(score: i64) -> Self {
        Self {
            profile: profile_for_score(score),
            score,
            index: risk_index(score),
        }
    }
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self::from_score(DEFAULT_RISK_SCORE)
    }
}

pub fn profile_for_score(score: i64) -> RiskProfile {
    if score <= CONSERVATIVE_MAX {
        RiskProfile::Conservative
    } else if score <= MODERATE_MAX {
        RiskProfile::Moderate
    } else {
        RiskProfile::Aggressive
    }
}

pub fn risk_index(score: i64) -> f64 {
    let raw = score.saturating_sub(SCORE_MIN) as f64 / (SCORE_MAX - SCORE_MIN) as f64;
    raw.clamp(0.0, 1.0)
}
