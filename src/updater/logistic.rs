use log::trace;
use ndarray::{Array1, ArrayView1};

use super::{ConsensusSum, DENOMINATOR_EPS, PrimalUpdater};
use crate::{
    config::LbfgsSpec,
    math::shrink_vec,
    objective::LocalObjective,
    optimization::Lbfgs,
    state::AdmmState,
};

/// Solves the logistic x-update of a single partition with L-BFGS.
#[derive(Debug, Clone, Copy)]
pub struct LocalSolver {
    lbfgs: Lbfgs,
    rho: f64,
}

impl LocalSolver {
    /// Creates a new `LocalSolver`.
    ///
    /// # Arguments
    /// * `lbfgs` - The quasi-Newton solver settings.
    /// * `rho` - The ADMM penalty parameter.
    ///
    /// # Returns
    /// A new `LocalSolver` instance.
    pub fn new(lbfgs: LbfgsSpec, rho: f64) -> Self {
        Self {
            lbfgs: Lbfgs::new(lbfgs),
            rho,
        }
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Minimizes the partition's augmented logistic loss, warm started at its current `x`.
    pub fn solve(&self, state: &AdmmState) -> AdmmState {
        let objective = LocalObjective::from_state(state, self.rho);
        let minimum = self.lbfgs.minimize(&objective, state.x().to_owned());

        trace!(
            value = minimum.value,
            iterations = minimum.iterations,
            converged = minimum.converged;
            "x-update solved"
        );

        state.with_x(minimum.x)
    }

    pub fn data_loss(&self, state: &AdmmState, w: ArrayView1<f64>) -> f64 {
        LocalObjective::from_state(state, self.rho).data_loss(w)
    }

    /// `rho * N`, the weight the consensus step gives to the averaged iterate.
    fn consensus_weight(&self, sum: &ConsensusSum) -> f64 {
        self.rho * sum.count as f64
    }
}

/// L1 regularized logistic regression, the consensus step is a soft threshold.
#[derive(Debug, Clone, Copy)]
pub struct SparseLogistic {
    solver: LocalSolver,
    lambda: f64,
}

impl SparseLogistic {
    /// Creates a new `SparseLogistic` updater.
    ///
    /// # Arguments
    /// * `solver` - The partition local solver.
    /// * `lambda` - The L1 penalty strength.
    ///
    /// # Returns
    /// A new `SparseLogistic` instance.
    pub fn new(solver: LocalSolver, lambda: f64) -> Self {
        Self { solver, lambda }
    }

    /// The soft threshold applied to `x_bar + u_bar`.
    pub fn threshold(&self, num_partitions: usize) -> f64 {
        self.lambda / (self.solver.rho * num_partitions as f64 + DENOMINATOR_EPS)
    }
}

impl PrimalUpdater for SparseLogistic {
    fn rho(&self) -> f64 {
        self.solver.rho()
    }

    fn x_update(&self, state: &AdmmState) -> AdmmState {
        self.solver.solve(state)
    }

    fn z_update(&self, sum: &ConsensusSum) -> Array1<f64> {
        let threshold = self.threshold(sum.count);
        shrink_vec(sum.combined().view(), threshold)
    }

    fn local_loss(&self, state: &AdmmState, w: ArrayView1<f64>) -> f64 {
        self.solver.data_loss(state, w)
    }

    fn penalty(&self, z: ArrayView1<f64>) -> f64 {
        self.lambda * z.iter().map(|v| v.abs()).sum::<f64>()
    }
}

/// L2 regularized logistic regression, the consensus step is a uniform shrink.
#[derive(Debug, Clone, Copy)]
pub struct RidgeLogistic {
    solver: LocalSolver,
    lambda: f64,
}

impl RidgeLogistic {
    /// Creates a new `RidgeLogistic` updater.
    ///
    /// # Arguments
    /// * `solver` - The partition local solver.
    /// * `lambda` - The L2 penalty strength.
    ///
    /// # Returns
    /// A new `RidgeLogistic` instance.
    pub fn new(solver: LocalSolver, lambda: f64) -> Self {
        Self { solver, lambda }
    }
}

impl PrimalUpdater for RidgeLogistic {
    fn rho(&self) -> f64 {
        self.solver.rho()
    }

    fn x_update(&self, state: &AdmmState) -> AdmmState {
        self.solver.solve(state)
    }

    fn z_update(&self, sum: &ConsensusSum) -> Array1<f64> {
        // argmin_z lambda/2 ||z||^2 + rho N / 2 ||z - (x_bar + u_bar)||^2
        let weight = self.solver.consensus_weight(sum);
        sum.combined() * (weight / (self.lambda + weight + DENOMINATOR_EPS))
    }

    fn local_loss(&self, state: &AdmmState, w: ArrayView1<f64>) -> f64 {
        self.solver.data_loss(state, w)
    }

    fn penalty(&self, z: ArrayView1<f64>) -> f64 {
        0.5 * self.lambda * z.dot(&z)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ndarray::array;

    use super::*;
    use crate::{data::LabeledPoint, objective::DiffFn, state::InitialState};

    fn solver() -> LocalSolver {
        LocalSolver::new(LbfgsSpec::default(), 1.)
    }

    fn sum() -> ConsensusSum {
        ConsensusSum {
            x_sum: array![3., -1., 0.2, 0.],
            u_sum: array![1., -1., 0., 0.],
            count: 2,
        }
    }

    #[test]
    fn zero_lambda_is_plain_averaging() {
        let expected = array![2., -1., 0.1, 0.];

        let sparse = SparseLogistic::new(solver(), 0.).z_update(&sum());
        assert_eq!(sparse, expected);

        let ridge = RidgeLogistic::new(solver(), 0.).z_update(&sum());
        for (r, e) in ridge.iter().zip(&expected) {
            assert!((r - e).abs() < 1e-5);
        }
    }

    #[test]
    fn sparse_consensus_soft_thresholds() {
        // threshold = 1 / (1 * 2 + eps) just below 0.5
        let updater = SparseLogistic::new(solver(), 1.);
        let z = updater.z_update(&sum());
        let t = updater.threshold(2);

        assert!(t < 0.5 && t > 0.4999);
        assert_eq!(z, array![2. - t, -1. + t, 0., 0.]);
    }

    #[test]
    fn ridge_consensus_scales_uniformly() {
        let z = RidgeLogistic::new(solver(), 2.).z_update(&sum());
        let scale = 2. / (4. + DENOMINATOR_EPS);

        assert_eq!(z, array![2., -1., 0.1, 0.] * scale);
    }

    #[test]
    fn x_update_moves_towards_the_label() {
        let points: Arc<[LabeledPoint]> = Arc::from(vec![LabeledPoint::new(1., vec![2.])]);
        let state = AdmmState::new(points, &InitialState::zeros(1));

        let next = SparseLogistic::new(solver(), 0.).x_update(&state);

        // stationary point of -log_phi(2w) + w^2 / 2
        let w = next.x()[0];
        let grad = 2. * (crate::math::phi(2. * w) - 1.) + w;
        assert!(w > 0.5 && w < 0.55, "w = {w}");
        assert!(grad.abs() < 1e-3, "gradient {grad}");
        assert_eq!(next.z(), state.z());
        assert_eq!(next.u(), state.u());
    }

    #[test]
    fn capped_solver_still_improves_on_the_warm_start() {
        let points: Arc<[LabeledPoint]> = Arc::from(vec![LabeledPoint::new(1., vec![2.])]);
        let state = AdmmState::new(points, &InitialState::zeros(1));
        let capped = LbfgsSpec {
            max_iterations: 1,
            ..LbfgsSpec::default()
        };
        let solver = LocalSolver::new(capped, 1.);

        let next = solver.solve(&state);
        let objective = LocalObjective::from_state(&state, 1.);

        assert!(objective.value(next.x()) < objective.value(state.x()));
    }

    #[test]
    fn penalties() {
        let z = array![1., -2., 0.];

        assert_eq!(SparseLogistic::new(solver(), 0.5).penalty(z.view()), 1.5);
        assert_eq!(RidgeLogistic::new(solver(), 0.5).penalty(z.view()), 1.25);
    }
}
