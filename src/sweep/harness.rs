use rayon::prelude::*;
use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::sweep::table::ResultTable;
use crate::train::loop_fn::validate_dataset;
use crate::train::{train_loop, TrainConfig, DEFAULT_SEED};

/// One point of a hyperparameter sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HyperparameterConfig {
    pub learning_rate: f64,
    pub hidden_size: usize,
}

impl HyperparameterConfig {
    pub fn new(learning_rate: f64, hidden_size: usize) -> Self {
        HyperparameterConfig { learning_rate, hidden_size }
    }

    /// Cartesian product in learning-rate-major order:
    /// `(lr0, h0), (lr0, h1), …, (lr1, h0), …`.
    pub fn grid(learning_rates: &[f64], hidden_sizes: &[usize]) -> Vec<HyperparameterConfig> {
        learning_rates.iter()
            .flat_map(|&lr| hidden_sizes.iter().map(move |&h| HyperparameterConfig::new(lr, h)))
            .collect()
    }

    fn train_config(&self, options: &SweepOptions) -> TrainConfig {
        TrainConfig::new(self.learning_rate, self.hidden_size, options.epochs).with_seed(options.seed)
    }
}

/// One line of the comparison table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub learning_rate: f64,
    pub hidden_size: usize,
    /// Written as `null` when not finite and read back as NaN.
    #[serde(with = "loss_or_null")]
    pub final_loss: f64,
}

mod loss_or_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(loss: &f64, s: S) -> Result<S::Ok, S::Error> {
        if loss.is_finite() {
            s.serialize_some(loss)
        } else {
            s.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
    }
}

impl ResultRow {
    /// `true` if the run ended with a NaN or infinite loss.
    pub fn diverged(&self) -> bool {
        !self.final_loss.is_finite()
    }
}

/// Settings shared by every entry of a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepOptions {
    pub epochs: usize,
    /// Every configuration starts from parameters drawn with this seed.
    pub seed: u64,
    /// Train entries on the rayon pool. Result order is unaffected.
    pub parallel: bool,
}

impl SweepOptions {
    pub fn new(epochs: usize) -> Self {
        SweepOptions {
            epochs,
            seed: DEFAULT_SEED,
            parallel: false,
        }
    }
}

/// Trains one independent network per configuration and collects the final
/// losses.
///
/// Row `i` of the result always belongs to `configs[i]`, whether the entries
/// ran sequentially or in parallel. Every configuration and the dataset are
/// validated before the first run starts; diverged runs are kept in the table
/// with their non-finite loss.
pub fn sweep(
    configs: &[HyperparameterConfig],
    inputs: &Matrix,
    labels: &Matrix,
    options: &SweepOptions,
) -> Result<ResultTable> {
    validate_dataset(inputs, labels)?;
    for (i, config) in configs.iter().enumerate() {
        config.train_config(options).validate().map_err(|e| match e {
            Error::InvalidHyperparameter(msg) => {
                Error::InvalidHyperparameter(format!("sweep entry {i}: {msg}"))
            }
            other => other,
        })?;
    }

    info!(
        entries = configs.len(),
        samples = inputs.rows,
        epochs = options.epochs,
        parallel = options.parallel,
        "sweep started"
    );

    let run = |(i, config): (usize, &HyperparameterConfig)| -> Result<ResultRow> {
        let report = train_loop(inputs, labels, &config.train_config(options))?;
        let row = ResultRow {
            learning_rate: config.learning_rate,
            hidden_size: config.hidden_size,
            final_loss: report.final_loss,
        };
        if row.diverged() {
            warn!(entry = i, lr = row.learning_rate, hidden = row.hidden_size, "sweep entry diverged");
        } else {
            info!(entry = i, lr = row.learning_rate, hidden = row.hidden_size, final_loss = row.final_loss, "sweep entry finished");
        }
        Ok(row)
    };

    let rows = if options.parallel {
        configs.par_iter().enumerate().map(run).collect::<Result<Vec<_>>>()?
    } else {
        configs.iter().enumerate().map(run).collect::<Result<Vec<_>>>()?
    };

    Ok(ResultTable { rows })
}
