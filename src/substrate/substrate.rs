use crate::{error::Result, state::AdmmState, substrate::Broadcast};

/// The data parallel execution layer the ADMM rounds run on.
///
/// A substrate owns one `AdmmState` per partition. Partition local work never sees another
/// partition's state, the only cross partition operation is `aggregate`.
pub trait Substrate: Sized {
    /// The amount of partitions.
    fn num_partitions(&self) -> usize;

    /// The total amount of training points across all partitions.
    fn count(&self) -> usize;

    /// The dimension shared by every weight vector.
    fn dim(&self) -> usize;

    /// Should replace every partition's state with `f(partition, state)`.
    ///
    /// # Arguments
    /// * `f` - A pure transition, may run concurrently on different partitions.
    ///
    /// # Returns
    /// The substrate holding the new states, or the first error raised by `f` or by the
    /// substrate itself. A failure on any partition fails the whole call.
    fn map_partitions<F>(self, f: F) -> Result<Self>
    where
        F: Fn(usize, &AdmmState) -> Result<AdmmState> + Send + Sync;

    /// Should reduce all partitions into a single value.
    ///
    /// # Arguments
    /// * `zero` - The neutral element, cloned once per partition.
    /// * `seq` - Folds one partition's state into an accumulator.
    /// * `comb` - Merges two accumulators, must be associative and commutative.
    ///
    /// # Returns
    /// The reduced value, or an error if any partition couldn't be reached.
    fn aggregate<A, S, C>(&self, zero: A, seq: S, comb: C) -> Result<A>
    where
        A: Clone + Send + Sync,
        S: Fn(A, &AdmmState) -> A + Send + Sync,
        C: Fn(A, A) -> A + Send + Sync;

    /// Makes `value` readable from every partition.
    fn broadcast<T: Send + Sync>(&self, value: T) -> Broadcast<T> {
        Broadcast::new(value)
    }
}
