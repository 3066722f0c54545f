use ndarray::{Array1, ArrayView1};

/// A single labeled training example.
///
/// The label is expected to be `-1` or `+1`, see `validate_partitions`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledPoint {
    pub label: f64,
    pub features: Array1<f64>,
}

impl LabeledPoint {
    /// Creates a new `LabeledPoint`.
    ///
    /// # Arguments
    /// * `label` - The class of the example, `-1` or `+1`.
    /// * `features` - The dense feature vector.
    ///
    /// # Returns
    /// A new `LabeledPoint` instance.
    pub fn new(label: f64, features: Vec<f64>) -> Self {
        Self {
            label,
            features: Array1::from(features),
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.features.len()
    }

    /// The signed margin `label * (w . features)` of this point under the weights `w`.
    #[inline]
    pub fn margin(&self, w: ArrayView1<f64>) -> f64 {
        self.label * self.features.dot(&w)
    }
}
