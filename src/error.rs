use std::fmt;

/// Errors surfaced by the training core.
#[derive(Debug)]
pub enum Error {
    /// Operand dimensions of a matrix operation are incompatible.
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },
    /// A learning rate, hidden size or dimension that cannot be trained with.
    InvalidHyperparameter(String),
    /// Malformed dataset: ragged rows, mismatched row counts, unparsable cells.
    InvalidData(String),
    /// Loss became NaN or infinite. Only produced by `TrainReport::ensure_finite`.
    NumericDegenerate { epoch: usize, loss: f64 },
    Io(std::io::Error),
    Json(serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn shape(op: &'static str, left: (usize, usize), right: (usize, usize)) -> Error {
        Error::ShapeMismatch { op, left, right }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ShapeMismatch { op, left, right } => write!(
                f,
                "shape mismatch in {op}: {}x{} vs {}x{}",
                left.0, left.1, right.0, right.1
            ),
            Error::InvalidHyperparameter(msg) => write!(f, "invalid hyperparameter: {msg}"),
            Error::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            Error::NumericDegenerate { epoch, loss } => {
                write!(f, "loss became non-finite ({loss}) at epoch {epoch}")
            }
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}
