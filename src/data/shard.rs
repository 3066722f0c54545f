use std::{num::NonZeroUsize, ops::Range};

use super::LabeledPoint;

/// Splits `total` samples among `num_partitions` and returns the range for `partition_id`.
///
/// Properties:
/// - Ranges are contiguous, disjoint and cover `[0..total)`.
/// - Sizes differ by at most 1.
///
/// # Panics
/// If `partition_id >= num_partitions`.
pub fn shard_range(
    total: usize,
    partition_id: usize,
    num_partitions: NonZeroUsize,
) -> Range<usize> {
    let n = num_partitions.get();
    assert!(partition_id < n, "partition_id out of range");

    let base = total / n;
    let rem = total % n;

    let start = partition_id * base + partition_id.min(rem);
    let extra = (partition_id < rem) as usize;

    start..start + base + extra
}

/// Splits a flat dataset into `num_partitions` balanced contiguous partitions.
///
/// Partitions may come out empty when there are fewer points than partitions, training
/// rejects those.
///
/// # Arguments
/// * `points` - The whole dataset.
/// * `num_partitions` - The amount of partitions to create.
///
/// # Returns
/// The partitions, in order.
pub fn partition(
    points: Vec<LabeledPoint>,
    num_partitions: NonZeroUsize,
) -> Vec<Vec<LabeledPoint>> {
    let total = points.len();
    let mut points = points.into_iter();

    (0..num_partitions.get())
        .map(|id| {
            let len = shard_range(total, id, num_partitions).len();
            points.by_ref().take(len).collect()
        })
        .collect()
}
