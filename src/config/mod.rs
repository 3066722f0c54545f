mod spec;

pub use spec::{AdmmSpec, LbfgsSpec, RegularizerSpec, StoppingSpec};
