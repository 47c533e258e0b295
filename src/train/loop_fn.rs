use std::sync::atomic::Ordering;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::loss::cross_entropy;
use crate::math::matrix::Matrix;
use crate::metrics::accuracy;
use crate::network::{backward, forward, ParameterSet};
use crate::optim::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

/// Outcome of one training run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    /// Loss of the last epoch run, or of the fresh parameters if none ran.
    /// May be NaN or infinite when training diverged.
    pub final_loss: f64,
    /// `loss_history[k]` is the loss observed in epoch `k + 1`, measured on
    /// the forward pass before that epoch's update.
    pub loss_history: Vec<f64>,
    /// Parameters after the last update.
    pub params: ParameterSet,
    /// Epochs actually executed; less than requested only if stopped early.
    pub epochs_run: usize,
}

impl TrainReport {
    pub fn is_finite(&self) -> bool {
        self.final_loss.is_finite()
    }

    /// Turns a diverged run into `Error::NumericDegenerate`, naming the first
    /// epoch whose loss was not finite.
    pub fn ensure_finite(&self) -> Result<&TrainReport> {
        if let Some((i, &loss)) = self.loss_history.iter().enumerate().find(|(_, l)| !l.is_finite()) {
            return Err(Error::NumericDegenerate { epoch: i + 1, loss });
        }
        if !self.final_loss.is_finite() {
            return Err(Error::NumericDegenerate { epoch: 0, loss: self.final_loss });
        }
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains a freshly initialized network on the full batch for
/// `config.epochs` epochs.
///
/// Each epoch runs forward → loss → backward → update over every row of
/// `inputs`; there is no shuffling, batching or early stopping. The network is
/// sized `inputs.cols → config.hidden_size → labels.cols` and seeded from
/// `config.seed`, so identical inputs and config give identical runs.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Errors
/// `InvalidHyperparameter` for a non-positive learning rate, hidden size or
/// sample count. `InvalidData` for a zero-width or malformed matrix, or a
/// feature/label row-count mismatch.
/// Both are raised before any computation. A diverging run is **not** an
/// error: its non-finite loss is reported in `final_loss`.
pub fn train_loop(
    inputs: &Matrix,
    labels: &Matrix,
    config: &TrainConfig,
) -> Result<TrainReport> {
    config.validate()?;
    validate_dataset(inputs, labels)?;

    let optimizer = Sgd::new(config.learning_rate)?;
    let mut params = ParameterSet::initialize(inputs.cols, config.hidden_size, labels.cols, config.seed)?;

    info!(
        samples = inputs.rows,
        n_in = inputs.cols,
        hidden = config.hidden_size,
        n_out = labels.cols,
        lr = config.learning_rate,
        epochs = config.epochs,
        "training started"
    );

    let mut loss_history = Vec::with_capacity(config.epochs);
    let mut reported_divergence = false;

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            warn!(epoch, "stop flag set, ending training early");
            break;
        }

        let t_start = Instant::now();
        let (loss, train_accuracy) = run_one_epoch(&mut params, inputs, labels, &optimizer)?;
        loss_history.push(loss);
        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        debug!(epoch, loss, accuracy = train_accuracy, elapsed_ms, "epoch finished");
        if !loss.is_finite() && !reported_divergence {
            warn!(epoch, loss, lr = config.learning_rate, "loss is no longer finite");
            reported_divergence = true;
        }

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            loss,
            accuracy: train_accuracy,
            elapsed_ms,
        };

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                warn!(epoch, "progress receiver dropped, ending training early");
                break;
            }
        }
    }

    let final_loss = match loss_history.last() {
        Some(&loss) => loss,
        None => cross_entropy(&forward(inputs, &params)?.a2, labels)?,
    };

    info!(final_loss, epochs_run = loss_history.len(), "training finished");

    Ok(TrainReport {
        final_loss,
        epochs_run: loss_history.len(),
        loss_history,
        params,
    })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// One full-batch gradient-descent step. Returns the loss and accuracy of the
/// forward pass that preceded the update.
fn run_one_epoch(
    params: &mut ParameterSet,
    inputs: &Matrix,
    labels: &Matrix,
    optimizer: &Sgd,
) -> Result<(f64, f64)> {
    let cache = forward(inputs, params)?;
    let loss = cross_entropy(&cache.a2, labels)?;
    let train_accuracy = accuracy(&cache.a2, labels)?;
    let grads = backward(inputs, labels, &cache, &params.w2)?;
    optimizer.step(params, &grads)?;
    Ok((loss, train_accuracy))
}

fn stop_requested(config: &TrainConfig) -> bool {
    config.stop_flag
        .as_ref()
        .map(|flag| flag.load(Ordering::Relaxed))
        .unwrap_or(false)
}

pub(crate) fn validate_dataset(inputs: &Matrix, labels: &Matrix) -> Result<()> {
    if inputs.rows == 0 {
        return Err(Error::InvalidHyperparameter("sample count must be > 0".into()));
    }
    if inputs.cols == 0 {
        return Err(Error::InvalidData("feature matrix must have at least one column".into()));
    }
    if labels.cols == 0 {
        return Err(Error::InvalidData("label matrix must have at least one column".into()));
    }
    for (name, m) in [("feature", inputs), ("label", labels)] {
        if !m.is_rectangular() {
            return Err(Error::InvalidData(format!(
                "{name} matrix is declared {}x{} but its rows do not match",
                m.rows, m.cols
            )));
        }
    }
    if inputs.rows != labels.rows {
        return Err(Error::InvalidData(format!(
            "feature matrix has {} rows but label matrix has {}",
            inputs.rows, labels.rows
        )));
    }
    Ok(())
}
