use std::sync::Arc;

use rayon::prelude::*;

use super::Substrate;
use crate::{
    data::{LabeledPoint, validate_partitions},
    error::Result,
    state::{AdmmState, InitialState},
};

/// An in-process substrate, partitions live in memory and run on the rayon thread pool.
///
/// Aggregations fold the per partition values in partition order, so two runs over the
/// same partitioning are bit identical regardless of scheduling.
#[derive(Debug, Clone)]
pub struct LocalCluster {
    states: Vec<AdmmState>,
    count: usize,
    dim: usize,
}

impl LocalCluster {
    /// Creates a new `LocalCluster` with every partition starting at `x = z = u = 0`.
    ///
    /// # Arguments
    /// * `partitions` - The partitioned training data.
    ///
    /// # Returns
    /// A new `LocalCluster` or the first input validation error.
    pub fn new(partitions: Vec<Vec<LabeledPoint>>) -> Result<Self> {
        let dim = validate_partitions(&partitions)?;
        Ok(Self::build(partitions, &InitialState::zeros(dim), dim))
    }

    /// Creates a new `LocalCluster` with every partition starting at `initial`.
    ///
    /// # Arguments
    /// * `partitions` - The partitioned training data.
    /// * `initial` - The starting `x`, `z` and `u` shared by all partitions.
    ///
    /// # Returns
    /// A new `LocalCluster` or an error if the data is invalid or `initial` doesn't match
    /// its dimension.
    pub fn with_initial(
        partitions: Vec<Vec<LabeledPoint>>,
        initial: &InitialState,
    ) -> Result<Self> {
        let dim = validate_partitions(&partitions)?;
        initial.check_dim(dim)?;
        Ok(Self::build(partitions, initial, dim))
    }

    fn build(partitions: Vec<Vec<LabeledPoint>>, initial: &InitialState, dim: usize) -> Self {
        let count = partitions.iter().map(Vec::len).sum();
        let states = partitions
            .into_iter()
            .map(|points| AdmmState::new(Arc::from(points), initial))
            .collect();

        Self { states, count, dim }
    }

    /// The current state of every partition, in partition order.
    pub fn states(&self) -> &[AdmmState] {
        &self.states
    }
}

impl Substrate for LocalCluster {
    fn num_partitions(&self) -> usize {
        self.states.len()
    }

    fn count(&self) -> usize {
        self.count
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn map_partitions<F>(self, f: F) -> Result<Self>
    where
        F: Fn(usize, &AdmmState) -> Result<AdmmState> + Send + Sync,
    {
        let states = self
            .states
            .par_iter()
            .enumerate()
            .map(|(partition, state)| f(partition, state))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { states, ..self })
    }

    fn aggregate<A, S, C>(&self, zero: A, seq: S, comb: C) -> Result<A>
    where
        A: Clone + Send + Sync,
        S: Fn(A, &AdmmState) -> A + Send + Sync,
        C: Fn(A, A) -> A + Send + Sync,
    {
        let partials: Vec<A> = self
            .states
            .par_iter()
            .map(|state| seq(zero.clone(), state))
            .collect();

        Ok(partials.into_iter().fold(zero, comb))
    }
}
