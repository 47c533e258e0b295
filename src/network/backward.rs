use crate::activation::relu_derivative;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::forward::ForwardCache;

/// Loss gradients, one per parameter tensor and of the same shape.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientSet {
    pub dw1: Matrix,
    pub db1: Matrix,
    pub dw2: Matrix,
    pub db2: Matrix,
}

/// Backpropagates the mean cross-entropy loss through softmax and ReLU.
///
/// Softmax and cross-entropy are differentiated together, which collapses to
/// `dZ2 = (A2 - Y) / m` with no softmax Jacobian involved:
///
/// ```text
/// dW2 = A1ᵀ·dZ2            db2 = colsum(dZ2)
/// dA1 = dZ2·W2ᵀ            dZ1 = dA1 ⊙ relu'(Z1)
/// dW1 = Xᵀ·dZ1             db1 = colsum(dZ1)
/// ```
pub fn backward(
    inputs: &Matrix,
    labels: &Matrix,
    cache: &ForwardCache,
    w2: &Matrix,
) -> Result<GradientSet> {
    if inputs.rows != cache.z1.rows {
        return Err(Error::shape("backward inputs", inputs.shape(), cache.z1.shape()));
    }
    if inputs.rows == 0 {
        return Err(Error::InvalidHyperparameter("backward needs at least one sample".into()));
    }
    let m = inputs.rows as f64;

    let dz2 = cache.a2.sub(labels)?.scale(1.0 / m);
    let dw2 = cache.a1.transpose().matmul(&dz2)?;
    let db2 = dz2.column_sums();

    let da1 = dz2.matmul(&w2.transpose())?;
    let dz1 = da1.hadamard(&cache.z1.map(relu_derivative))?;
    let dw1 = inputs.transpose().matmul(&dz1)?;
    let db1 = dz1.column_sums();

    Ok(GradientSet { dw1, db1, dw2, db2 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::forward::forward;
    use crate::network::params::ParameterSet;

    fn toy_batch(m: usize, n_in: usize, n_out: usize) -> (Matrix, Matrix) {
        let x = Matrix::from_rows(
            (0..m).map(|i| (0..n_in).map(|j| ((i + 2 * j) as f64 * 0.61).cos().abs()).collect()).collect(),
        ).unwrap();
        let y = Matrix::from_rows(
            (0..m).map(|i| (0..n_out).map(|j| if j == i % n_out { 1.0 } else { 0.0 }).collect()).collect(),
        ).unwrap();
        (x, y)
    }

    #[test]
    fn gradient_shapes_match_parameter_shapes() {
        for &(n_in, h, n_out) in &[(1, 1, 1), (3, 2, 2), (8, 5, 3), (4, 16, 10)] {
            let params = ParameterSet::initialize(n_in, h, n_out, 9).unwrap();
            let (x, y) = toy_batch(6, n_in, n_out);
            let cache = forward(&x, &params).unwrap();
            let grads = backward(&x, &y, &cache, &params.w2).unwrap();
            assert_eq!(grads.dw1.shape(), params.w1.shape());
            assert_eq!(grads.db1.shape(), params.b1.shape());
            assert_eq!(grads.dw2.shape(), params.w2.shape());
            assert_eq!(grads.db2.shape(), params.b2.shape());
        }
    }

    #[test]
    fn output_bias_gradient_sums_to_zero() {
        // Each row of A2 - Y sums to 0 for one-hot labels, so colsum(dZ2) does too.
        let params = ParameterSet::initialize(4, 3, 3, 2).unwrap();
        let (x, y) = toy_batch(5, 4, 3);
        let cache = forward(&x, &params).unwrap();
        let grads = backward(&x, &y, &cache, &params.w2).unwrap();
        assert!(grads.db2.data[0].iter().sum::<f64>().abs() < 1e-12);
    }

    #[test]
    fn label_shape_mismatch_is_rejected() {
        let params = ParameterSet::initialize(4, 3, 3, 2).unwrap();
        let (x, _) = toy_batch(5, 4, 3);
        let (_, wrong_y) = toy_batch(5, 4, 2);
        let cache = forward(&x, &params).unwrap();
        assert!(matches!(
            backward(&x, &wrong_y, &cache, &params.w2),
            Err(Error::ShapeMismatch { op: "sub", .. })
        ));
    }
}
