use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Preprocessed features paired with their label distributions.
///
/// `inputs` is `m × n_in`, `labels` is `m × n_out`; row `i` of each belongs
/// to the same sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub inputs: Matrix,
    pub labels: Matrix,
}

impl Dataset {
    pub fn new(inputs: Matrix, labels: Matrix) -> Result<Dataset> {
        if inputs.rows != labels.rows {
            return Err(Error::InvalidData(format!(
                "{} feature rows but {} label rows",
                inputs.rows, labels.rows
            )));
        }
        Ok(Dataset { inputs, labels })
    }

    /// Builds a dataset from per-sample vectors, as produced by the loaders.
    pub fn from_rows(inputs: Vec<Vec<f64>>, labels: Vec<Vec<f64>>) -> Result<Dataset> {
        Dataset::new(Matrix::from_rows(inputs)?, Matrix::from_rows(labels)?)
    }

    pub fn len(&self) -> usize {
        self.inputs.rows
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.rows == 0
    }

    pub fn feature_count(&self) -> usize {
        self.inputs.cols
    }

    pub fn class_count(&self) -> usize {
        self.labels.cols
    }

    /// The first `n` samples (all of them if `n` exceeds the dataset size).
    pub fn subset(&self, n: usize) -> Dataset {
        Dataset {
            inputs: self.inputs.head_rows(n),
            labels: self.labels.head_rows(n),
        }
    }
}
