use crate::domain::plan::GoalProjection;

pub fn future_value_lump_sum(pv: f64, rate: f64, periods: i64) -> f64 {
    pv * (1.0 + rate).powf(periods as f64)
}

pub fn future_value_annuity(payment: f64, rate: f64, periods: i64) -> f64 {
    if rate == 0.0 {
        return payment * periods as f64;
    }
    payment * (((1.0 + rate).powf(periods as f64) - 1.0) / rate)
}

/// Flat monthly top-up needed to close the gap, ignoring growth.
///
/// The horizon is clamped to at least one month for the division only.
pub fn required_monthly_contribution(initial_capital: i64, target: i64, months: i64) -> i64 {
    let gap = target.saturating_sub(initial_capital);
    gap.div_euclid(months.max(1)).max(0)
}

/// Projects the capital plus the required contribution stream and checks it reaches `target`.
///
/// `months` is used as supplied for compounding, even when it is zero or negative.
pub fn project_goal(initial_capital: i64, target: i64, months: i64, rate: f64) -> GoalProjection {
    let required = required_monthly_contribution(initial_capital, target, months);

    let total = future_value_lump_sum(initial_capital as f64, rate, months)
        + future_value_annuity(required as f64, rate, months);

    GoalProjection {
        required_monthly_contribution: required,
        projected_future_value: total,
        feasible: total >= target as f64,
        monthly_rate: rate,
        months,
    }
}
