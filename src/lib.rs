pub mod error;
pub mod math;
pub mod activation;
pub mod network;
pub mod loss;
pub mod optim;
pub mod metrics;
pub mod train;
pub mod sweep;
pub mod data;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use network::{backward, forward, ForwardCache, GradientSet, ParameterSet};
pub use loss::cross_entropy;
pub use optim::Sgd;
pub use train::{train, train_loop, EpochStats, TrainConfig, TrainReport};
pub use sweep::{sweep, HyperparameterConfig, ResultRow, ResultTable, SweepOptions, SweepPlan};
pub use data::Dataset;
