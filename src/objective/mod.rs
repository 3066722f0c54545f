mod diff_fn;
mod logistic;

pub use diff_fn::DiffFn;
pub use logistic::LocalObjective;
