use super::{LocalSolver, PrimalUpdater, RidgeLogistic, SparseLogistic};
use crate::config::{AdmmSpec, RegularizerSpec};

/// Resolves the `PrimalUpdater` described by `spec`.
///
/// # Arguments
/// * `spec` - A validated training specification.
///
/// # Returns
/// The boxed updater for the configured regularizer.
pub fn build_updater(spec: &AdmmSpec) -> Box<dyn PrimalUpdater> {
    let solver = LocalSolver::new(spec.lbfgs, spec.rho);

    match spec.regularizer {
        RegularizerSpec::L1 => Box::new(SparseLogistic::new(solver, spec.lambda)),
        RegularizerSpec::L2 => Box::new(RidgeLogistic::new(solver, spec.lambda)),
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::updater::ConsensusSum;

    #[test]
    fn regularizer_selects_the_consensus_step() {
        let sum = ConsensusSum {
            x_sum: array![0.4],
            u_sum: array![0.],
            count: 1,
        };

        let mut spec = AdmmSpec::new(1, 1., 1.);
        assert_eq!(build_updater(&spec).z_update(&sum), array![0.]);

        spec.regularizer = RegularizerSpec::L2;
        assert!(build_updater(&spec).z_update(&sum)[0] > 0.);
    }
}
