//! Numerical core of the advisor: risk quantification, mean-variance weights, profile blending,
//! trend scoring, fund distribution and goal projection.

pub mod blend;
pub mod distribution;
pub mod goal;
pub mod optimizer;
pub mod risk;
pub mod scoring;

/// Annualized expected returns for growth, blue-chip and bond classes.
pub const EXPECTED_RETURNS: [f64; 3] = [0.15, 0.10, 0.05];

/// Static covariance assumption over the same three classes.
pub const COVARIANCE: [[f64; 3]; 3] = [
    [0.10, 0.02, 0.01],
    [0.02, 0.08, 0.01],
    [0.01, 0.01, 0.03],
];

/// Tolerance used when checking that a weight vector sums to one.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;
