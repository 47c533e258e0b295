use crate::error::{Error, Result};
use crate::network::{GradientSet, ParameterSet};

/// Vanilla full-batch gradient descent with a fixed learning rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    /// Rejects learning rates that are zero, negative or not finite.
    pub fn new(learning_rate: f64) -> Result<Sgd> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(Error::InvalidHyperparameter(format!(
                "learning rate must be finite and > 0, got {learning_rate}"
            )));
        }
        Ok(Sgd { learning_rate })
    }

    /// Applies `param ← param - lr · grad` to each of the four tensors.
    pub fn step(&self, params: &mut ParameterSet, grads: &GradientSet) -> Result<()> {
        params.apply_gradients(grads, self.learning_rate)
    }
}

impl ParameterSet {
    /// Applies pre-computed gradients scaled by lr.
    ///
    /// All four gradient shapes are checked before any tensor is touched, so
    /// a mismatch leaves the parameters unchanged.
    pub fn apply_gradients(&mut self, grads: &GradientSet, lr: f64) -> Result<()> {
        let pairs = [
            ("dw1", &self.w1, &grads.dw1),
            ("db1", &self.b1, &grads.db1),
            ("dw2", &self.w2, &grads.dw2),
            ("db2", &self.b2, &grads.db2),
        ];
        for (name, param, grad) in pairs {
            if param.shape() != grad.shape() {
                return Err(Error::shape(name, param.shape(), grad.shape()));
            }
        }
        self.w1.scaled_sub_assign(&grads.dw1, lr)?;
        self.b1.scaled_sub_assign(&grads.db1, lr)?;
        self.w2.scaled_sub_assign(&grads.dw2, lr)?;
        self.b2.scaled_sub_assign(&grads.db2, lr)?;
        Ok(())
    }
}
