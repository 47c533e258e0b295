pub mod trainer;
pub mod epoch_stats;
pub mod train_config;
pub mod loop_fn;

pub use trainer::train;
pub use epoch_stats::EpochStats;
pub use train_config::{TrainConfig, DEFAULT_SEED};
pub use loop_fn::{train_loop, TrainReport};
