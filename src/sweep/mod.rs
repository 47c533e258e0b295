pub mod harness;
pub mod plan;
pub mod table;

pub use harness::{sweep, HyperparameterConfig, ResultRow, SweepOptions};
pub use plan::SweepPlan;
pub use table::ResultTable;
