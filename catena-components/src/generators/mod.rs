mod fixed;
mod random;

pub use fixed::{FixedGenerator, PARAM_FIXED_VALUE};
pub use random::{RandomGenerator, PARAM_RANGE_MAX, PARAM_RANGE_MIN, PARAM_SEED};
