use crate::error::ComputationError;

const SINGULAR_PIVOT: f64 = 1e-12;

/// Closed-form mean-variance weights projected onto the long-only simplex.
///
/// `raw = Σ⁻¹·μ` is normalized to sum to one, negative entries are clipped to zero and the
/// result is renormalized. This is a heuristic projection, not the constrained optimum: it keeps
/// whatever mass the unconstrained solution assigned to the surviving assets.
pub fn optimize_long_only(
    expected_returns: &[f64],
    covariance: &[Vec<f64>],
) -> Result<Vec<f64>, ComputationError> {
    let n = expected_returns.len();
    if covariance.len() != n {
        return Err(ComputationError::DimensionMismatch {
            expected: n,
            actual: covariance.len(),
        });
    }
    if let Some(row) = covariance.iter().find(|row| row.len() != n) {
        return Err(ComputationError::DimensionMismatch {
            expected: n,
            actual: row.len(),
        });
    }
    if !expected_returns.iter().all(|v| v.is_finite()) {
        return Err(ComputationError::NonFiniteInput("expected returns"));
    }
    if !covariance.iter().flatten().all(|v| v.is_finite()) {
        return Err(ComputationError::NonFiniteInput("covariance matrix"));
    }

    let inv = mat_inverse(covariance)?;
    let mut weights = mat_vec_multiply(&inv, expected_returns);

    normalize(&mut weights, "raw")?;
    for w in weights.iter_mut() {
        if *w < 0.0 {
            *w = 0.0;
        }
    }
    normalize(&mut weights, "clipped")?;

    tracing::debug!(?weights, "mean-variance weights");
    Ok(weights)
}

/// Convenience wrapper over the fixed three-class assumption.
pub fn optimize_three(
    expected_returns: &[f64; 3],
    covariance: &[[f64; 3]; 3],
) -> Result<[f64; 3], ComputationError> {
    let cov: Vec<Vec<f64>> = covariance.iter().map(|row| row.to_vec()).collect();
    let w = optimize_long_only(expected_returns, &cov)?;
    Ok([w[0], w[1], w[2]])
}

fn normalize(w: &mut [f64], stage: &'static str) -> Result<(), ComputationError> {
    let sum: f64 = w.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return Err(ComputationError::DegenerateWeights { stage, sum });
    }
    for wi in w.iter_mut() {
        *wi /= sum;
    }
    Ok(())
}

fn mat_vec_multiply(mat: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    mat.iter()
        .map(|row| row.iter().zip(v).map(|(a, b)| a * b).sum())
        .collect()
}

/// Gauss-Jordan inverse with partial pivoting.
#[allow(clippy::needless_range_loop)]
pub(crate) fn mat_inverse(mat: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ComputationError> {
    let n = mat.len();
    let mut aug: Vec<Vec<f64>> = Vec::with_capacity(n);
    for i in 0..n {
        let mut row = Vec::with_capacity(2 * n);
        row.extend_from_slice(&mat[i]);
        for j in 0..n {
            row.push(if i == j { 1.0 } else { 0.0 });
        }
        aug.push(row);
    }

    for col in 0..n {
        let mut max_row = col;
        let mut max_val = aug[col][col].abs();
        for row in (col + 1)..n {
            let val = aug[row][col].abs();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }

        if max_val < SINGULAR_PIVOT {
            return Err(ComputationError::SingularMatrix {
                column: col,
                pivot: max_val,
            });
        }

        if max_row != col {
            aug.swap(col, max_row);
        }

        let pivot = aug[col][col];
        for cell in aug[col].iter_mut() {
            *cell /= pivot;
        }

        let pivot_row = aug[col].clone();
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = aug[row][col];
            for (cell, &pv) in aug[row].iter_mut().zip(pivot_row.iter()) {
                *cell -= factor * pv;
            }
        }
    }

    Ok(aug.into_iter().map(|row| row[n..].to_vec()).collect())
}
