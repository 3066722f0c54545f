use ndarray::{Array1, ArrayView1};

use super::ConsensusSum;
use crate::state::AdmmState;

/// The partition local and global halves of an ADMM round for one loss/regularizer pair.
///
/// The outer loop only talks to this trait, so swapping the loss or the regularizer never
/// touches the driver.
pub trait PrimalUpdater: Send + Sync {
    /// The ADMM penalty parameter.
    fn rho(&self) -> f64;

    /// Should minimize the local augmented objective, warm started at the state's `x`.
    ///
    /// # Arguments
    /// * `state` - The partition's current state.
    ///
    /// # Returns
    /// The same state holding the new `x`.
    fn x_update(&self, state: &AdmmState) -> AdmmState;

    /// Should compute the new consensus from the aggregated `x` and `u`.
    ///
    /// # Arguments
    /// * `sum` - The sums of every partition's `x` and `u`.
    ///
    /// # Returns
    /// The new consensus `z`.
    fn z_update(&self, sum: &ConsensusSum) -> Array1<f64>;

    /// The local data loss of `state`'s partition at `w`, without any penalty.
    fn local_loss(&self, state: &AdmmState, w: ArrayView1<f64>) -> f64;

    /// The regularization term at the consensus `z`.
    fn penalty(&self, z: ArrayView1<f64>) -> f64;
}

impl<P: PrimalUpdater + ?Sized> PrimalUpdater for Box<P> {
    fn rho(&self) -> f64 {
        (**self).rho()
    }

    fn x_update(&self, state: &AdmmState) -> AdmmState {
        (**self).x_update(state)
    }

    fn z_update(&self, sum: &ConsensusSum) -> Array1<f64> {
        (**self).z_update(sum)
    }

    fn local_loss(&self, state: &AdmmState, w: ArrayView1<f64>) -> f64 {
        (**self).local_loss(state, w)
    }

    fn penalty(&self, z: ArrayView1<f64>) -> f64 {
        (**self).penalty(z)
    }
}
