pub mod params;
pub mod forward;
pub mod backward;

pub use params::ParameterSet;
pub use forward::{forward, ForwardCache};
pub use backward::{backward, GradientSet};
