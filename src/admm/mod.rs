mod optimizer;
mod report;

pub use optimizer::{AdmmOptimizer, Trained};
pub use report::{RoundStats, TrainingReport};
