use ndarray::{Array1, ArrayView1};

/// A differentiable scalar function over dense vectors.
pub trait DiffFn {
    /// The dimension of the domain.
    fn dim(&self) -> usize;

    /// Should evaluate the function and its gradient at `w`.
    ///
    /// # Arguments
    /// * `w` - The point to evaluate at, of length `dim()`.
    ///
    /// # Returns
    /// The value and the gradient at `w`.
    fn value_and_gradient(&self, w: ArrayView1<f64>) -> (f64, Array1<f64>);

    fn value(&self, w: ArrayView1<f64>) -> f64 {
        self.value_and_gradient(w).0
    }
}
