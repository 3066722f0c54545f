use std::num::NonZeroUsize;

use log::{debug, info};
use ndarray::Array1;

use super::{RoundStats, TrainingReport};
use crate::{
    config::{AdmmSpec, StoppingSpec},
    error::Result,
    substrate::{Broadcast, Substrate},
    updater::{ConsensusSum, PrimalUpdater, build_updater},
};

/// A finished training run together with the substrate in its final state.
#[derive(Debug)]
pub struct Trained<S> {
    pub substrate: S,
    pub report: TrainingReport,
}

/// Per partition quantities reduced after the dual update of a round.
#[derive(Debug, Clone, Copy, Default)]
struct ResidualSum {
    primal_sq: f64,
    x_sq: f64,
    u_sq: f64,
    loss: f64,
}

impl ResidualSum {
    fn merge(self, other: Self) -> Self {
        Self {
            primal_sq: self.primal_sq + other.primal_sq,
            x_sq: self.x_sq + other.x_sq,
            u_sq: self.u_sq + other.u_sq,
            loss: self.loss + other.loss,
        }
    }
}

/// The outer ADMM loop.
///
/// Every round runs the x-update on all partitions, a single consensus step over the
/// aggregated `x` and `u`, then the dual update on all partitions.
pub struct AdmmOptimizer<P: PrimalUpdater> {
    updater: P,
    num_iterations: usize,
    stopping: Option<StoppingSpec>,
}

impl AdmmOptimizer<Box<dyn PrimalUpdater>> {
    /// Creates the optimizer described by `spec`.
    ///
    /// # Arguments
    /// * `spec` - The training specification.
    ///
    /// # Returns
    /// A new `AdmmOptimizer` or an `InvalidConfig` error.
    pub fn from_spec(spec: &AdmmSpec) -> Result<Self> {
        spec.validate()?;

        Ok(Self {
            updater: build_updater(spec),
            num_iterations: spec.num_iterations,
            stopping: spec.stopping,
        })
    }
}

impl<P: PrimalUpdater> AdmmOptimizer<P> {
    /// Creates a new `AdmmOptimizer` running exactly `num_iterations` rounds.
    ///
    /// # Arguments
    /// * `updater` - The x-update and z-update pair.
    /// * `num_iterations` - The amount of rounds.
    ///
    /// # Returns
    /// A new `AdmmOptimizer` instance.
    pub fn new(updater: P, num_iterations: NonZeroUsize) -> Self {
        Self {
            updater,
            num_iterations: num_iterations.get(),
            stopping: None,
        }
    }

    /// Lets the run end as soon as both residuals are within `stopping`.
    pub fn with_stopping(mut self, stopping: StoppingSpec) -> Self {
        self.stopping = Some(stopping);
        self
    }

    /// Trains until the last round or until the stopping criterion holds.
    ///
    /// # Arguments
    /// * `substrate` - The partitions, in their initial state.
    ///
    /// # Returns
    /// The final consensus, per round diagnostics and the final substrate, or the first
    /// substrate failure. No partial result is returned on failure.
    pub fn run<S: Substrate>(&self, substrate: S) -> Result<Trained<S>> {
        info!(
            partitions = substrate.num_partitions(),
            points = substrate.count(),
            dim = substrate.dim(),
            rounds = self.num_iterations;
            "starting admm training"
        );

        let mut z = initial_consensus(&substrate)?;
        let mut substrate = substrate;
        let mut rounds = Vec::with_capacity(self.num_iterations);
        let mut converged = false;

        for round in 1..=self.num_iterations {
            let (next, z_next, stats, sums) = self.round(substrate, round, &z)?;
            substrate = next;
            z = z_next;

            info!(
                round = stats.round,
                primal_residual = stats.primal_residual,
                dual_residual = stats.dual_residual,
                objective = stats.objective,
                nonzeros = stats.nonzeros;
                "admm round finished"
            );

            rounds.push(stats);

            if let Some(stopping) = self.stopping
                && self.within_tolerance(&stopping, &stats, &sums, &substrate, &z)
            {
                debug!(round = round; "residuals within tolerance, stopping early");
                converged = true;
                break;
            }
        }

        info!(rounds = rounds.len(), converged = converged; "admm training finished");

        Ok(Trained {
            substrate,
            report: TrainingReport {
                weights: z,
                rounds,
                converged,
            },
        })
    }

    /// Runs a single x-update, z-update, dual update transition.
    fn round<S: Substrate>(
        &self,
        substrate: S,
        round: usize,
        z_prev: &Array1<f64>,
    ) -> Result<(S, Array1<f64>, RoundStats, ResidualSum)> {
        let updater = &self.updater;

        let substrate = substrate.map_partitions(|_, state| Ok(updater.x_update(state)))?;

        let sum = ConsensusSum::aggregate(&substrate)?;
        let num_partitions = sum.count;
        let z: Broadcast<Array1<f64>> = substrate.broadcast(updater.z_update(&sum));

        let substrate =
            substrate.map_partitions(|_, state| Ok(state.with_z(&z).dual_step()))?;

        let sums = substrate.aggregate(
            ResidualSum::default(),
            |acc, state| {
                let r = &state.x() - &*z;
                let part = ResidualSum {
                    primal_sq: r.dot(&r),
                    x_sq: state.x().dot(&state.x()),
                    u_sq: state.u().dot(&state.u()),
                    loss: updater.local_loss(state, z.view()),
                };

                acc.merge(part)
            },
            ResidualSum::merge,
        )?;

        let dz = &*z - z_prev;
        let stats = RoundStats {
            round,
            primal_residual: sums.primal_sq.sqrt(),
            dual_residual: updater.rho() * (num_partitions as f64).sqrt() * dz.dot(&dz).sqrt(),
            objective: sums.loss + updater.penalty(z.view()),
            nonzeros: z.iter().filter(|v| **v != 0.).count(),
        };

        Ok((substrate, (*z).clone(), stats, sums))
    }

    fn within_tolerance<S: Substrate>(
        &self,
        stopping: &StoppingSpec,
        stats: &RoundStats,
        sums: &ResidualSum,
        substrate: &S,
        z: &Array1<f64>,
    ) -> bool {
        let n = substrate.num_partitions() as f64;
        let scale = (n * substrate.dim() as f64).sqrt() * stopping.abs_tol;

        let z_norm = n.sqrt() * z.dot(z).sqrt();
        let eps_primal = scale + stopping.rel_tol * sums.x_sq.sqrt().max(z_norm);
        let eps_dual = scale + stopping.rel_tol * self.updater.rho() * sums.u_sq.sqrt();

        stats.primal_residual <= eps_primal && stats.dual_residual <= eps_dual
    }
}

/// The consensus the partitions start from, taken from the first partition.
fn initial_consensus<S: Substrate>(substrate: &S) -> Result<Array1<f64>> {
    let first = substrate.aggregate(
        None,
        |acc: Option<Array1<f64>>, state| acc.or_else(|| Some(state.z().to_owned())),
        |a, b| a.or(b),
    )?;

    Ok(first.unwrap_or_else(|| Array1::zeros(substrate.dim())))
}
