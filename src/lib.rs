pub mod admm;
pub mod config;
pub mod data;
pub mod error;
pub mod math;
pub mod objective;
pub mod optimization;
pub mod state;
pub mod substrate;
pub mod updater;

use ndarray::Array1;

pub use admm::{AdmmOptimizer, RoundStats, TrainingReport};
pub use config::{AdmmSpec, LbfgsSpec, RegularizerSpec, StoppingSpec};
pub use data::LabeledPoint;
pub use error::{AdmmErr, Result};
pub use state::InitialState;
pub use substrate::{LocalCluster, Substrate};

/// Trains an L1 regularized logistic regression model over already partitioned data.
///
/// Every partition starts at `x = z = u = 0` and exactly `num_iterations` rounds are run
/// with the default local solver settings.
///
/// # Arguments
/// * `partitions` - The labeled points, one vector per partition.
/// * `num_iterations` - The amount of outer ADMM rounds.
/// * `lambda` - The L1 penalty strength.
/// * `rho` - The ADMM penalty parameter.
///
/// # Returns
/// The consensus weights, of the same dimension as the features.
///
/// # Errors
/// Returns an `AdmmErr` if the data or the parameters are invalid.
pub fn train(
    partitions: Vec<Vec<LabeledPoint>>,
    num_iterations: usize,
    lambda: f64,
    rho: f64,
) -> Result<Array1<f64>> {
    let spec = AdmmSpec::new(num_iterations, lambda, rho);
    let report = train_with_report(partitions, &spec, None)?;
    Ok(report.weights)
}

/// Trains a model as described by `spec` on an in-process `LocalCluster`.
///
/// # Arguments
/// * `partitions` - The labeled points, one vector per partition.
/// * `spec` - The full training specification.
/// * `initial` - The starting point of every partition, zeros when `None`.
///
/// # Returns
/// The consensus weights together with per round diagnostics.
///
/// # Errors
/// Returns an `AdmmErr` if the spec, the data or the initial state are invalid.
pub fn train_with_report(
    partitions: Vec<Vec<LabeledPoint>>,
    spec: &AdmmSpec,
    initial: Option<&InitialState>,
) -> Result<TrainingReport> {
    let optimizer = AdmmOptimizer::from_spec(spec)?;

    let cluster = match initial {
        Some(initial) => LocalCluster::with_initial(partitions, initial)?,
        None => LocalCluster::new(partitions)?,
    };

    let trained = optimizer.run(cluster)?;
    Ok(trained.report)
}
