use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::train::loop_fn::{train_loop, TrainReport};
use crate::train::train_config::TrainConfig;

/// Trains a fresh network with the default seed and returns the report.
///
/// Shorthand for `train_loop` with `TrainConfig::new(learning_rate,
/// hidden_size, epochs)`.
pub fn train(
    inputs: &Matrix,
    labels: &Matrix,
    learning_rate: f64,
    hidden_size: usize,
    epochs: usize,
) -> Result<TrainReport> {
    train_loop(inputs, labels, &TrainConfig::new(learning_rate, hidden_size, epochs))
}
