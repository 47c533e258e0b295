use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use crate::error::{Error, Result};
use crate::train::epoch_stats::EpochStats;

/// Seed used when none is given explicitly.
pub const DEFAULT_SEED: u64 = 42;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `learning_rate`: fixed gradient-descent step size, must be > 0
/// - `hidden_size`: width of the ReLU hidden layer, must be ≥ 1
/// - `epochs`: number of full-batch updates; `0` only measures the
///    loss of the freshly initialized parameters
/// - `seed`: seeds weight initialization
/// - `progress_tx`: optional channel sender; one `EpochStats` is sent per
///    completed epoch.  If the receiver is dropped the loop
///    terminates early.
/// - `stop_flag`: optional atomic flag; when set to `true` from another
///    thread the loop terminates before the next epoch.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub learning_rate: f64,
    pub hidden_size: usize,
    pub epochs: usize,
    pub seed: u64,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with the default seed, no progress channel and
    /// no stop flag.
    pub fn new(learning_rate: f64, hidden_size: usize, epochs: usize) -> Self {
        TrainConfig {
            learning_rate,
            hidden_size,
            epochs,
            seed: DEFAULT_SEED,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidHyperparameter(format!(
                "learning rate must be finite and > 0, got {}",
                self.learning_rate
            )));
        }
        if self.hidden_size == 0 {
            return Err(Error::InvalidHyperparameter("hidden size must be at least 1".into()));
        }
        Ok(())
    }
}
