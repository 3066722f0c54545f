use std::collections::VecDeque;

use log::{debug, trace};
use ndarray::Array1;

use crate::{config::LbfgsSpec, objective::DiffFn};

/// Sufficient decrease constant of the Armijo condition.
const ARMIJO_C1: f64 = 1e-4;

/// Maximum amount of step halvings per line search.
const MAX_BACKTRACKS: usize = 50;

/// Curvature pairs with `s.y` below this are discarded.
const MIN_CURVATURE: f64 = 1e-10;

/// A gradient with a norm below this is considered zero.
const GRAD_EPS: f64 = 1e-12;

/// The outcome of a minimization.
///
/// `x` is always the best iterate found, even when `converged` is false.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub x: Array1<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

struct CurvaturePair {
    s: Array1<f64>,
    y: Array1<f64>,
    sy: f64,
}

/// Limited-memory BFGS minimizer with a backtracking line search.
#[derive(Debug, Clone, Copy)]
pub struct Lbfgs {
    max_iterations: usize,
    history_size: usize,
    tolerance: f64,
}

impl Lbfgs {
    /// Creates a new `Lbfgs` minimizer.
    ///
    /// # Arguments
    /// * `spec` - Iteration cap, memory size and relative improvement tolerance.
    ///
    /// # Returns
    /// A new `Lbfgs` instance.
    pub fn new(spec: LbfgsSpec) -> Self {
        Self {
            max_iterations: spec.max_iterations,
            history_size: spec.history_size.max(1),
            tolerance: spec.tolerance,
        }
    }

    /// Minimizes `f` starting from `x0`.
    ///
    /// Stops when the relative improvement of the objective drops below the tolerance,
    /// when the gradient vanishes, when no step along the search direction decreases the
    /// objective or after `max_iterations` steps. Never fails, the best iterate is returned.
    ///
    /// # Arguments
    /// * `f` - The function to minimize.
    /// * `x0` - The starting point, usually the previous solution.
    ///
    /// # Returns
    /// The best iterate and how the search ended.
    pub fn minimize<F: DiffFn>(&self, f: &F, x0: Array1<f64>) -> Minimum {
        debug_assert_eq!(x0.len(), f.dim(), "starting point outside the domain");

        let mut x = x0;
        let (mut fx, mut g) = f.value_and_gradient(x.view());
        let mut history: VecDeque<CurvaturePair> = VecDeque::with_capacity(self.history_size);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            let g_norm = g.dot(&g).sqrt();
            if g_norm <= GRAD_EPS {
                converged = true;
                break;
            }

            let mut d = direction(&g, &history);
            let mut slope = g.dot(&d);

            if !(slope < 0.) {
                // The curvature memory went stale, restart from steepest descent.
                history.clear();
                d = -&g;
                slope = -g_norm * g_norm;
            }

            let initial_step = if history.is_empty() {
                (1. / g_norm).min(1.)
            } else {
                1.
            };

            let Some((step, x_next, f_next, g_next)) =
                line_search(f, &x, fx, &d, slope, initial_step)
            else {
                debug!(iterations = iterations, value = fx; "lbfgs line search made no progress");
                break;
            };

            trace!(iteration = iterations, value = f_next, step = step; "lbfgs step");

            let s = &x_next - &x;
            let y = &g_next - &g;
            let sy = s.dot(&y);

            if sy > MIN_CURVATURE {
                if history.len() == self.history_size {
                    history.pop_front();
                }

                history.push_back(CurvaturePair { s, y, sy });
            }

            let improvement = (fx - f_next).abs() / fx.abs().max(f_next.abs()).max(1.);

            x = x_next;
            fx = f_next;
            g = g_next;
            iterations += 1;

            if improvement < self.tolerance {
                converged = true;
                break;
            }
        }

        if !converged {
            debug!(iterations = iterations, value = fx; "lbfgs stopped before converging");
        }

        Minimum {
            x,
            value: fx,
            iterations,
            converged,
        }
    }
}

/// Two-loop recursion, returns `-H g` for the implicit inverse Hessian `H`.
fn direction(g: &Array1<f64>, history: &VecDeque<CurvaturePair>) -> Array1<f64> {
    let mut q = g.clone();
    let mut alphas = Vec::with_capacity(history.len());

    for pair in history.iter().rev() {
        let alpha = pair.s.dot(&q) / pair.sy;
        q.scaled_add(-alpha, &pair.y);
        alphas.push(alpha);
    }

    if let Some(last) = history.back() {
        q *= last.sy / last.y.dot(&last.y);
    }

    for (pair, alpha) in history.iter().zip(alphas.into_iter().rev()) {
        let beta = pair.y.dot(&q) / pair.sy;
        q.scaled_add(alpha - beta, &pair.s);
    }

    q.mapv_inplace(|v| -v);
    q
}

/// Backtracking search for a step satisfying the Armijo condition.
fn line_search<F: DiffFn>(
    f: &F,
    x: &Array1<f64>,
    fx: f64,
    d: &Array1<f64>,
    slope: f64,
    initial_step: f64,
) -> Option<(f64, Array1<f64>, f64, Array1<f64>)> {
    let mut step = initial_step;

    for _ in 0..MAX_BACKTRACKS {
        let mut x_next = x.clone();
        x_next.scaled_add(step, d);

        let (f_next, g_next) = f.value_and_gradient(x_next.view());
        if f_next.is_finite() && f_next <= fx + ARMIJO_C1 * step * slope && f_next < fx {
            return Some((step, x_next, f_next, g_next));
        }

        step *= 0.5;
    }

    None
}
