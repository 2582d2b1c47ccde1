use thiserror::Error;

/// Failure of the numerical part of an allocation request.
///
/// Any of these makes the whole plan unavailable; callers must not substitute default weights.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputationError {
    #[error("singular covariance matrix (pivot {pivot:e} in column {column})")]
    SingularMatrix { column: usize, pivot: f64 },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("optimizer weights cannot be normalized: {stage} sum is {sum}")]
    DegenerateWeights { stage: &'static str, sum: f64 },

    #[error("non-finite value in {0}")]
    NonFiniteInput(&'static str),
}
