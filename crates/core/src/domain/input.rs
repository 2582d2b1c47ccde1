use crate::domain::plan::AllocationPolicy;
use serde::{Deserialize, Serialize};

/// Parses a loosely formatted currency amount such as `"Rp 10.000.000"`.
///
/// Every non-digit character is dropped; an input without digits yields 0.
pub fn parse_amount(s: &str) -> i64 {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<i64>().unwrap_or(i64::MAX)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizonUnit {
    #[default]
    Months,
    Years,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    pub value: i64,
    pub unit: HorizonUnit,
}

impl Horizon {
    pub fn months(value: i64) -> Self {
        Self {
            value,
            unit: HorizonUnit::Months,
        }
    }

    pub fn years(value: i64) -> Self {
        Self {
            value,
            unit: HorizonUnit::Years,
        }
    }

    pub fn to_months(self) -> i64 {
        match self.unit {
            HorizonUnit::Months => self.value,
            HorizonUnit::Years => self.value.saturating_mul(12),
        }
    }
}

/// Everything one allocation request needs from the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub goal: String,
    pub initial_capital: i64,
    pub target_amount: i64,
    pub horizon: Horizon,
    /// Questionnaire answers; `None` falls back to the default moderate score.
    pub answers: Option<Vec<i64>>,
    #[serde(default)]
    pub policy: AllocationPolicy,
}
