use ndarray::{Array1, ArrayView1};

/// The soft-threshold operator `sign(v) * max(0, |v| - threshold)`.
///
/// This is the proximal operator of `threshold * |v|`.
#[inline]
pub fn shrink(v: f64, threshold: f64) -> f64 {
    if v > threshold {
        v - threshold
    } else if v < -threshold {
        v + threshold
    } else {
        0.
    }
}

/// Applies `shrink` elementwise.
pub fn shrink_vec(v: ArrayView1<f64>, threshold: f64) -> Array1<f64> {
    v.mapv(|x| shrink(x, threshold))
}
