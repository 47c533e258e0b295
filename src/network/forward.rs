use crate::activation::{relu, softmax};
use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::params::ParameterSet;

/// Intermediate values of one forward pass, kept for the backward pass.
///
/// `z1`, `a1` are `m × h`; `z2`, `a2` are `m × n_out`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardCache {
    pub z1: Matrix,
    pub a1: Matrix,
    pub z2: Matrix,
    pub a2: Matrix,
}

/// Runs `inputs` (`m × n_in`) through the network:
///
/// ```text
/// Z1 = X·W1 + b1     A1 = relu(Z1)
/// Z2 = A1·W2 + b2    A2 = softmax(Z2)
/// ```
///
/// Fails with `ShapeMismatch` if `inputs` does not have `n_in` columns.
pub fn forward(inputs: &Matrix, params: &ParameterSet) -> Result<ForwardCache> {
    let z1 = inputs.matmul(&params.w1)?.add_row(&params.b1)?;
    let a1 = z1.map(relu);
    let z2 = a1.matmul(&params.w2)?.add_row(&params.b2)?;
    let a2 = softmax(&z2);
    Ok(ForwardCache { z1, a1, z2, a2 })
}

impl ParameterSet {
    /// Class probabilities for every row of `inputs`.
    pub fn predict(&self, inputs: &Matrix) -> Result<Matrix> {
        forward(inputs, self).map(|cache| cache.a2)
    }
}
