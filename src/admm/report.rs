use ndarray::Array1;

/// Diagnostics of a completed ADMM round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundStats {
    /// One based index of the round.
    pub round: usize,
    /// `sqrt(sum_i ||x_i - z||^2)`
    pub primal_residual: f64,
    /// `rho * sqrt(N) * ||z - z_prev||`
    pub dual_residual: f64,
    /// Total data loss at the consensus plus the regularization term.
    pub objective: f64,
    /// Amount of non zero consensus weights.
    pub nonzeros: usize,
}

/// The outcome of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    /// The final consensus weights.
    pub weights: Array1<f64>,
    pub rounds: Vec<RoundStats>,
    /// Whether the residual stopping criterion ended the run early.
    pub converged: bool,
}

impl TrainingReport {
    /// The objective after every round, in order.
    pub fn objectives(&self) -> Vec<f64> {
        self.rounds.iter().map(|r| r.objective).collect()
    }
}
