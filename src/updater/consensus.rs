use ndarray::Array1;

use crate::{error::Result, state::AdmmState, substrate::Substrate};

/// Added to the consensus denominators so `rho * N == 0` never divides by zero.
pub const DENOMINATOR_EPS: f64 = 1e-5;

/// Elementwise sums of every partition's `x` and `u`.
///
/// Built as a pure reduction: each partition contributes an immutable value and `merge`
/// is associative and commutative, so the result doesn't depend on partition order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusSum {
    pub x_sum: Array1<f64>,
    pub u_sum: Array1<f64>,
    pub count: usize,
}

impl ConsensusSum {
    /// The neutral element of `merge`.
    pub fn zeros(dim: usize) -> Self {
        Self {
            x_sum: Array1::zeros(dim),
            u_sum: Array1::zeros(dim),
            count: 0,
        }
    }

    /// The contribution of a single partition.
    pub fn from_state(state: &AdmmState) -> Self {
        Self {
            x_sum: state.x().to_owned(),
            u_sum: state.u().to_owned(),
            count: 1,
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            x_sum: self.x_sum + other.x_sum,
            u_sum: self.u_sum + other.u_sum,
            count: self.count + other.count,
        }
    }

    /// Reduces every partition of `substrate` in a single aggregation pass.
    pub fn aggregate<S: Substrate>(substrate: &S) -> Result<Self> {
        substrate.aggregate(
            Self::zeros(substrate.dim()),
            |acc, state| acc.merge(Self::from_state(state)),
            Self::merge,
        )
    }

    /// `x_bar + u_bar`, the point the consensus step is computed from.
    ///
    /// # Returns
    /// The averaged vector, all zeros when nothing was aggregated.
    pub fn combined(&self) -> Array1<f64> {
        if self.count == 0 {
            return Array1::zeros(self.x_sum.len());
        }

        let n = self.count as f64;
        &self.x_sum / n + &self.u_sum / n
    }
}
