use rand::{rngs::StdRng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Standard deviation of the initial weight distribution. Small enough that
/// the softmax output starts close to uniform.
pub const INIT_STD_DEV: f64 = 0.01;

/// All trainable state of the two-layer perceptron.
///
/// Shapes: `w1: n_in × h`, `b1: 1 × h`, `w2: h × n_out`, `b2: 1 × n_out`.
/// Biases are stored as single-row matrices and added to every row of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub w1: Matrix,
    pub b1: Matrix,
    pub w2: Matrix,
    pub b2: Matrix,
}

impl ParameterSet {
    /// Draws weights from N(0, 0.01²) and zeroes the biases. Deterministic for
    /// a given `seed`.
    pub fn initialize(n_in: usize, hidden: usize, n_out: usize, seed: u64) -> Result<ParameterSet> {
        if n_in == 0 || hidden == 0 || n_out == 0 {
            return Err(Error::InvalidHyperparameter(format!(
                "layer sizes must be at least 1, got n_in={n_in}, hidden={hidden}, n_out={n_out}"
            )));
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let w1 = Matrix::gaussian(n_in, hidden, INIT_STD_DEV, &mut rng);
        let w2 = Matrix::gaussian(hidden, n_out, INIT_STD_DEV, &mut rng);
        Ok(ParameterSet {
            w1,
            b1: Matrix::zeros(1, hidden),
            w2,
            b2: Matrix::zeros(1, n_out),
        })
    }

    /// Assembles a parameter set from explicit tensors, checking that the
    /// four shapes chain together.
    pub fn from_parts(w1: Matrix, b1: Matrix, w2: Matrix, b2: Matrix) -> Result<ParameterSet> {
        let params = ParameterSet { w1, b1, w2, b2 };
        params.validate()?;
        Ok(params)
    }

    pub fn input_size(&self) -> usize {
        self.w1.rows
    }

    pub fn hidden_size(&self) -> usize {
        self.w1.cols
    }

    pub fn output_size(&self) -> usize {
        self.w2.cols
    }

    /// Total number of trainable scalars.
    pub fn parameter_count(&self) -> usize {
        let (n_in, h, n_out) = (self.input_size(), self.hidden_size(), self.output_size());
        n_in * h + h + h * n_out + n_out
    }

    /// Checks the shape invariants between the four tensors and that every
    /// row has the declared width (deserialized data is not trusted).
    pub fn validate(&self) -> Result<()> {
        for m in [&self.w1, &self.b1, &self.w2, &self.b2] {
            if m.rows == 0 || m.cols == 0 || !m.is_rectangular() {
                return Err(Error::InvalidData(format!(
                    "parameter tensor declared {}x{} is empty or ragged",
                    m.rows, m.cols
                )));
            }
        }
        let h = self.w1.cols;
        if self.b1.shape() != (1, h) {
            return Err(Error::shape("b1", self.w1.shape(), self.b1.shape()));
        }
        if self.w2.rows != h {
            return Err(Error::shape("w2", self.w1.shape(), self.w2.shape()));
        }
        if self.b2.shape() != (1, self.w2.cols) {
            return Err(Error::shape("b2", self.w2.shape(), self.b2.shape()));
        }
        Ok(())
    }

    /// Serializes the parameters to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes parameters previously written by `save_json`, rejecting
    /// files whose shapes do not chain.
    pub fn load_json(path: &str) -> Result<ParameterSet> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let params: ParameterSet = serde_json::from_reader(reader)?;
        params.validate()?;
        Ok(params)
    }
}
