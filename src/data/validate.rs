use super::LabeledPoint;
use crate::error::{AdmmErr, Result};

/// Checks the training data once before any round runs.
///
/// Every partition must be non empty, every label must be `-1` or `+1` and every feature
/// vector must be finite and share the dimension of the very first point.
///
/// # Arguments
/// * `partitions` - The partitioned training data.
///
/// # Returns
/// The common feature dimension or the first violation found.
pub fn validate_partitions<P: AsRef<[LabeledPoint]>>(partitions: &[P]) -> Result<usize> {
    let first = partitions
        .first()
        .ok_or(AdmmErr::NoPartitions)?
        .as_ref()
        .first()
        .ok_or(AdmmErr::EmptyPartition { partition: 0 })?;

    let expected = first.dim();

    for (partition, points) in partitions.iter().enumerate() {
        let points = points.as_ref();

        if points.is_empty() {
            return Err(AdmmErr::EmptyPartition { partition });
        }

        for (index, point) in points.iter().enumerate() {
            if point.label != 1. && point.label != -1. {
                return Err(AdmmErr::InvalidLabel {
                    partition,
                    index,
                    label: point.label,
                });
            }

            if point.dim() != expected {
                return Err(AdmmErr::DimensionMismatch {
                    partition,
                    index,
                    got: point.dim(),
                    expected,
                });
            }

            if point.features.iter().any(|v| !v.is_finite()) {
                return Err(AdmmErr::NonFiniteFeature { partition, index });
            }
        }
    }

    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(label: f64, features: &[f64]) -> LabeledPoint {
        LabeledPoint::new(label, features.to_vec())
    }

    #[test]
    fn valid_data_reports_its_dimension() {
        let parts = vec![vec![p(1., &[1., 2.])], vec![p(-1., &[0., 3.]), p(1., &[1., 1.])]];
        assert_eq!(validate_partitions(&parts).unwrap(), 2);
    }

    #[test]
    fn no_partitions() {
        let parts: Vec<Vec<LabeledPoint>> = vec![];
        assert!(matches!(
            validate_partitions(&parts),
            Err(AdmmErr::NoPartitions)
        ));
    }

    #[test]
    fn empty_partition() {
        let parts = vec![vec![p(1., &[1.])], vec![]];
        assert!(matches!(
            validate_partitions(&parts),
            Err(AdmmErr::EmptyPartition { partition: 1 })
        ));
    }

    #[test]
    fn zero_one_labels_are_rejected() {
        let parts = vec![vec![p(1., &[1.]), p(0., &[1.])]];
        assert!(matches!(
            validate_partitions(&parts),
            Err(AdmmErr::InvalidLabel {
                partition: 0,
                index: 1,
                ..
            })
        ));
    }

    #[test]
    fn mismatched_dimensions() {
        let parts = vec![vec![p(1., &[1., 2.])], vec![p(1., &[1.])]];
        assert!(matches!(
            validate_partitions(&parts),
            Err(AdmmErr::DimensionMismatch {
                partition: 1,
                index: 0,
                got: 1,
                expected: 2
            })
        ));
    }

    #[test]
    fn nan_features() {
        let parts = vec![vec![p(1., &[f64::NAN])]];
        assert!(matches!(
            validate_partitions(&parts),
            Err(AdmmErr::NonFiniteFeature { .. })
        ));
    }
}
