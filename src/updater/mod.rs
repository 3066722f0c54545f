mod builder;
mod consensus;
mod logistic;
mod primal;

pub use builder::build_updater;
pub use consensus::{ConsensusSum, DENOMINATOR_EPS};
pub use logistic::{LocalSolver, RidgeLogistic, SparseLogistic};
pub use primal::PrimalUpdater;
