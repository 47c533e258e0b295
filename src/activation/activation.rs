use crate::math::matrix::Matrix;

/// Element-wise ReLU: `max(0, z)`.
pub fn relu(x: f64) -> f64 {
    if x > 0.0 { x } else { 0.0 }
}

/// Subgradient of ReLU. The derivative at exactly 0 is taken as 0.
pub fn relu_derivative(x: f64) -> f64 {
    if x > 0.0 { 1.0 } else { 0.0 }
}

/// Row-wise softmax.
///
/// Each row has its maximum subtracted before exponentiation, so large
/// logits cannot overflow `exp`. Every output row is non-negative and sums
/// to 1 (within floating-point tolerance).
pub fn softmax(logits: &Matrix) -> Matrix {
    let data = logits.data.iter()
        .map(|row| softmax_row(row))
        .collect();
    Matrix {
        rows: logits.rows,
        cols: logits.cols,
        data,
    }
}

fn softmax_row(row: &[f64]) -> Vec<f64> {
    let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = row.iter().map(|&z| (z - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
