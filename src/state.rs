use std::sync::Arc;

use ndarray::{Array1, ArrayView1};

use crate::{
    data::LabeledPoint,
    error::{AdmmErr, Result},
};

/// Caller supplied starting point of a training run, shared by every partition.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialState {
    pub x: Array1<f64>,
    pub z: Array1<f64>,
    pub u: Array1<f64>,
}

impl InitialState {
    /// The default starting point, `x = z = u = 0`.
    pub fn zeros(dim: usize) -> Self {
        Self {
            x: Array1::zeros(dim),
            z: Array1::zeros(dim),
            u: Array1::zeros(dim),
        }
    }

    /// Warm starts every partition from a previously trained consensus.
    pub fn from_consensus(z: Array1<f64>) -> Self {
        Self {
            x: z.clone(),
            u: Array1::zeros(z.len()),
            z,
        }
    }

    /// Checks that all three vectors have dimension `dim`.
    pub fn check_dim(&self, dim: usize) -> Result<()> {
        for (name, v) in [("x", &self.x), ("z", &self.z), ("u", &self.u)] {
            if v.len() != dim {
                return Err(AdmmErr::InitialStateMismatch {
                    name,
                    got: v.len(),
                    expected: dim,
                });
            }
        }

        Ok(())
    }
}

/// The state of one partition between two ADMM transitions.
///
/// A state is never mutated, every transition builds a new one. The training points are
/// shared with every state derived from the same partition.
#[derive(Debug, Clone, PartialEq)]
pub struct AdmmState {
    points: Arc<[LabeledPoint]>,
    x: Array1<f64>,
    z: Array1<f64>,
    u: Array1<f64>,
}

impl AdmmState {
    /// Creates a new `AdmmState` starting from `initial`.
    ///
    /// # Arguments
    /// * `points` - The partition's training points.
    /// * `initial` - The starting `x`, `z` and `u`.
    ///
    /// # Returns
    /// A new `AdmmState` instance.
    pub fn new(points: Arc<[LabeledPoint]>, initial: &InitialState) -> Self {
        Self {
            points,
            x: initial.x.clone(),
            z: initial.z.clone(),
            u: initial.u.clone(),
        }
    }

    #[inline]
    pub fn points(&self) -> &[LabeledPoint] {
        &self.points
    }

    #[inline]
    pub fn x(&self) -> ArrayView1<'_, f64> {
        self.x.view()
    }

    #[inline]
    pub fn z(&self) -> ArrayView1<'_, f64> {
        self.z.view()
    }

    #[inline]
    pub fn u(&self) -> ArrayView1<'_, f64> {
        self.u.view()
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.z.len()
    }

    /// The state after an x-update produced `x`.
    pub fn with_x(&self, x: Array1<f64>) -> Self {
        debug_assert_eq!(x.len(), self.dim());

        Self {
            points: Arc::clone(&self.points),
            x,
            z: self.z.clone(),
            u: self.u.clone(),
        }
    }

    /// The state after the consensus `z` was broadcast.
    pub fn with_z(&self, z: &Array1<f64>) -> Self {
        debug_assert_eq!(z.len(), self.dim());

        Self {
            points: Arc::clone(&self.points),
            x: self.x.clone(),
            z: z.clone(),
            u: self.u.clone(),
        }
    }

    /// The state after the dual update `u <- u + x - z`.
    pub fn dual_step(&self) -> Self {
        let u = &self.u + &self.x - &self.z;

        Self {
            points: Arc::clone(&self.points),
            x: self.x.clone(),
            z: self.z.clone(),
            u,
        }
    }
}
