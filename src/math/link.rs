/// Margins are clamped to `[-MARGIN_CLAMP, MARGIN_CLAMP]` before exponentiation.
pub const MARGIN_CLAMP: f64 = 10.;

/// The logistic sigmoid `1 / (1 + e^-m)` of a clamped margin.
///
/// Branches on the sign of the clamped margin so the argument of `exp` is never positive.
pub fn phi(margin: f64) -> f64 {
    let t = margin.clamp(-MARGIN_CLAMP, MARGIN_CLAMP);

    if t >= 0. {
        1. / (1. + (-t).exp())
    } else {
        let e = t.exp();
        e / (1. + e)
    }
}

/// `ln(phi(margin))` computed directly from the clamped margin.
///
/// Bounded below by `ln(phi(-MARGIN_CLAMP))`, so it never reaches `-inf`.
pub fn log_phi(margin: f64) -> f64 {
    let t = margin.clamp(-MARGIN_CLAMP, MARGIN_CLAMP);

    if t >= 0. {
        -(-t).exp().ln_1p()
    } else {
        t - t.exp().ln_1p()
    }
}
