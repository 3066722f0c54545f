use serde::{Deserialize, Serialize};

use crate::error::{AdmmErr, Result};

/// The specification for the regularizer applied in the consensus step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegularizerSpec {
    /// `lambda * ||z||_1`, solved with the soft-threshold operator.
    #[default]
    L1,
    /// `lambda / 2 * ||z||^2`, solved with a uniform scaling.
    L2,
}

/// The specification for the local quasi-Newton solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LbfgsSpec {
    /// The maximum amount of steps taken per x-update.
    pub max_iterations: usize,
    /// The amount of curvature pairs kept in memory.
    pub history_size: usize,
    /// Threshold on the relative improvement of the objective between two steps.
    pub tolerance: f64,
}

impl Default for LbfgsSpec {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            history_size: 10,
            tolerance: 1e-6,
        }
    }
}

/// Residual based stopping criterion, checked after every round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoppingSpec {
    pub abs_tol: f64,
    pub rel_tol: f64,
}

impl Default for StoppingSpec {
    fn default() -> Self {
        Self {
            abs_tol: 1e-4,
            rel_tol: 1e-3,
        }
    }
}

/// The specification of a whole training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmmSpec {
    /// The amount of outer ADMM rounds.
    pub num_iterations: usize,
    /// Regularization strength.
    pub lambda: f64,
    /// ADMM penalty parameter.
    pub rho: f64,
    pub regularizer: RegularizerSpec,
    pub lbfgs: LbfgsSpec,
    /// When set, training may end before `num_iterations` rounds.
    pub stopping: Option<StoppingSpec>,
}

impl Default for AdmmSpec {
    fn default() -> Self {
        Self {
            num_iterations: 20,
            lambda: 0.,
            rho: 1.,
            regularizer: RegularizerSpec::default(),
            lbfgs: LbfgsSpec::default(),
            stopping: None,
        }
    }
}

impl AdmmSpec {
    /// Creates a new `AdmmSpec` with default solver settings.
    ///
    /// # Arguments
    /// * `num_iterations` - The amount of outer rounds.
    /// * `lambda` - The regularization strength.
    /// * `rho` - The ADMM penalty parameter.
    ///
    /// # Returns
    /// A new `AdmmSpec` instance.
    pub fn new(num_iterations: usize, lambda: f64, rho: f64) -> Self {
        Self {
            num_iterations,
            lambda,
            rho,
            ..Self::default()
        }
    }

    /// Parses and validates a specification from its json representation.
    ///
    /// # Arguments
    /// * `json` - The json document, missing fields take their default value.
    ///
    /// # Returns
    /// The parsed specification or an error if it's malformed or invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: Self = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Checks every field against its domain.
    ///
    /// # Returns
    /// An `InvalidConfig` error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.num_iterations == 0 {
            return Err(invalid("num_iterations", "must be positive"));
        }

        if !self.lambda.is_finite() || self.lambda < 0. {
            return Err(invalid("lambda", format!("must be >= 0, got {}", self.lambda)));
        }

        if !self.rho.is_finite() || self.rho <= 0. {
            return Err(invalid("rho", format!("must be > 0, got {}", self.rho)));
        }

        let LbfgsSpec {
            max_iterations,
            history_size,
            tolerance,
        } = self.lbfgs;

        if max_iterations == 0 {
            return Err(invalid("lbfgs.max_iterations", "must be positive"));
        }

        if history_size == 0 {
            return Err(invalid("lbfgs.history_size", "must be positive"));
        }

        if tolerance.is_nan() || tolerance < 0. {
            return Err(invalid(
                "lbfgs.tolerance",
                format!("must be >= 0, got {tolerance}"),
            ));
        }

        if let Some(StoppingSpec { abs_tol, rel_tol }) = self.stopping {
            if abs_tol.is_nan() || abs_tol < 0. {
                return Err(invalid("stopping.abs_tol", format!("must be >= 0, got {abs_tol}")));
            }

            if rel_tol.is_nan() || rel_tol < 0. {
                return Err(invalid("stopping.rel_tol", format!("must be >= 0, got {rel_tol}")));
            }
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> AdmmErr {
    AdmmErr::InvalidConfig {
        field,
        reason: reason.into(),
    }
}
