use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Small epsilon added inside log() to prevent log(0) = -inf.
pub const EPS: f64 = 1e-8;

/// Mean categorical cross-entropy over a batch:
///
/// ```text
/// L = -(1/m) · Σᵢ Σⱼ Y[i,j] · ln(A2[i,j] + ε)
/// ```
///
/// `predicted` holds softmax probabilities and `expected` one-hot (or soft)
/// targets, both `m × n_out`. Shapes must match exactly; nothing is broadcast.
/// A NaN in `predicted` propagates to the result rather than being masked.
/// The result is never negative.
pub fn cross_entropy(predicted: &Matrix, expected: &Matrix) -> Result<f64> {
    if predicted.shape() != expected.shape() {
        return Err(Error::shape("cross_entropy", predicted.shape(), expected.shape()));
    }
    if predicted.rows == 0 {
        return Err(Error::InvalidHyperparameter("cross_entropy needs at least one sample".into()));
    }
    let total: f64 = predicted.iter_rows().zip(expected.iter_rows())
        .flat_map(|(p_row, y_row)| p_row.iter().zip(y_row.iter()))
        .map(|(p, y)| -y * (p + EPS).ln())
        .sum();
    let loss = total / predicted.rows as f64;
    // ln(1 + ε) > 0 makes a saturated correct prediction score -ε; floor at
    // zero with a comparison so NaN still passes through.
    Ok(if loss < 0.0 { 0.0 } else { loss })
}
