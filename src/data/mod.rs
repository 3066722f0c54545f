mod point;
mod shard;
mod validate;

pub use point::LabeledPoint;
pub use shard::{partition, shard_range};
pub use validate::validate_partitions;
