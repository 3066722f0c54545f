use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used across the whole crate.
pub type Result<T> = std::result::Result<T, AdmmErr>;

/// The crate's error type.
///
/// Every variant is structural: numeric trouble inside a round (saturated margins, a local
/// solver hitting its iteration cap) is absorbed and never surfaces here.
#[derive(Debug)]
pub enum AdmmErr {
    NoPartitions,
    EmptyPartition {
        partition: usize,
    },
    InvalidLabel {
        partition: usize,
        index: usize,
        label: f64,
    },
    DimensionMismatch {
        partition: usize,
        index: usize,
        got: usize,
        expected: usize,
    },
    NonFiniteFeature {
        partition: usize,
        index: usize,
    },
    InitialStateMismatch {
        name: &'static str,
        got: usize,
        expected: usize,
    },
    InvalidConfig {
        field: &'static str,
        reason: String,
    },
    Json(serde_json::Error),
    Substrate {
        partition: usize,
        reason: String,
    },
}

impl Display for AdmmErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdmmErr::NoPartitions => write!(f, "the training data has no partitions"),
            AdmmErr::EmptyPartition { partition } => {
                write!(f, "partition {partition} holds no training points")
            }
            AdmmErr::InvalidLabel {
                partition,
                index,
                label,
            } => write!(
                f,
                "point {index} of partition {partition} has label {label}, expected -1 or +1"
            ),
            AdmmErr::DimensionMismatch {
                partition,
                index,
                got,
                expected,
            } => write!(
                f,
                "point {index} of partition {partition} has {got} features, expected {expected}"
            ),
            AdmmErr::NonFiniteFeature { partition, index } => write!(
                f,
                "point {index} of partition {partition} has a non finite feature"
            ),
            AdmmErr::InitialStateMismatch {
                name,
                got,
                expected,
            } => write!(
                f,
                "initial {name} has dimension {got}, the data has dimension {expected}"
            ),
            AdmmErr::InvalidConfig { field, reason } => {
                write!(f, "invalid configuration for `{field}`: {reason}")
            }
            AdmmErr::Json(e) => write!(f, "failed to parse the configuration: {e}"),
            AdmmErr::Substrate { partition, reason } => {
                write!(f, "partition {partition} failed: {reason}")
            }
        }
    }
}

impl Error for AdmmErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AdmmErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AdmmErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
