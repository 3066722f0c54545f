use ndarray::{Array1, ArrayView1, Zip};

use super::DiffFn;
use crate::{
    data::LabeledPoint,
    math::{log_phi, phi},
    state::AdmmState,
};

/// The augmented local objective of one partition.
///
/// `f(w) = sum_i -log_phi(y_i * w.a_i) + rho / 2 * ||w - z + u||^2`
///
/// `z` and `u` are frozen for the whole x-update, only `w` varies.
#[derive(Debug, Clone, Copy)]
pub struct LocalObjective<'a> {
    points: &'a [LabeledPoint],
    z: ArrayView1<'a, f64>,
    u: ArrayView1<'a, f64>,
    rho: f64,
}

impl<'a> LocalObjective<'a> {
    /// Creates a new `LocalObjective`.
    ///
    /// # Arguments
    /// * `points` - The partition's training points.
    /// * `z` - The current consensus weights.
    /// * `u` - The partition's current scaled dual.
    /// * `rho` - The ADMM penalty parameter.
    ///
    /// # Returns
    /// A new `LocalObjective` instance.
    pub fn new(
        points: &'a [LabeledPoint],
        z: ArrayView1<'a, f64>,
        u: ArrayView1<'a, f64>,
        rho: f64,
    ) -> Self {
        Self { points, z, u, rho }
    }

    /// Borrows the objective of `state` at its current `z` and `u`.
    pub fn from_state(state: &'a AdmmState, rho: f64) -> Self {
        Self::new(state.points(), state.z(), state.u(), rho)
    }

    /// The unregularized logistic loss `sum_i -log_phi(y_i * w.a_i)`.
    pub fn data_loss(&self, w: ArrayView1<f64>) -> f64 {
        self.points.iter().map(|p| -log_phi(p.margin(w))).sum()
    }

    /// `w - z + u`, the residual the quadratic penalty acts on.
    fn offset(&self, w: ArrayView1<f64>) -> Array1<f64> {
        let mut offset = w.to_owned();
        offset -= &self.z;
        offset += &self.u;
        offset
    }
}

impl DiffFn for LocalObjective<'_> {
    fn dim(&self) -> usize {
        self.z.len()
    }

    fn value_and_gradient(&self, w: ArrayView1<f64>) -> (f64, Array1<f64>) {
        let offset = self.offset(w);
        let mut loss = 0.5 * self.rho * offset.dot(&offset);

        // d/dw rho/2 ||w - z + u||^2 = rho * (w - z + u)
        let mut grad = offset * self.rho;

        for point in self.points {
            let margin = point.margin(w);
            loss -= log_phi(margin);

            let scale = point.label * (phi(margin) - 1.);
            Zip::from(&mut grad)
                .and(&point.features)
                .for_each(|g, &a| *g += scale * a);
        }

        (loss, grad)
    }
}
