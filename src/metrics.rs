use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Fraction of rows whose predicted argmax equals the label argmax.
pub fn accuracy(predicted: &Matrix, expected: &Matrix) -> Result<f64> {
    if predicted.shape() != expected.shape() {
        return Err(Error::shape("accuracy", predicted.shape(), expected.shape()));
    }
    if predicted.rows == 0 {
        return Ok(0.0);
    }
    let correct = predicted.iter_rows().zip(expected.iter_rows())
        .filter(|(p, y)| argmax(p) == argmax(y))
        .count();
    Ok(correct as f64 / predicted.rows as f64)
}

/// Index of the maximum element in a slice. Ties resolve to the lowest index.
pub fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, &x) in v.iter().enumerate() {
        if x > v[best] {
            best = i;
        }
    }
    best
}
