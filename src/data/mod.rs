pub mod builtin;
pub mod csv;
pub mod dataset;

pub use builtin::{builtin_blobs, builtin_xor};
pub use csv::{load_csv, parse_csv, LabelMode};
pub use dataset::Dataset;
