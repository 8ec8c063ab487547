//! Mapping a key to the partition it belongs to.
//!
//! Boundaries are exclusive upper limits: partition `i` holds the keys `k` with
//! `boundaries[i - 1] <= k < boundaries[i]`. A key equal to a boundary therefore belongs to the
//! partition above that boundary.

use crate::error::PartitionError;

/// Returns the index of the partition `key` belongs to.
///
/// This is the upper bound of `key` in `boundaries`: the smallest `idx` with
/// `boundaries[idx] > key`. When no boundary is larger (only possible for `key == i64::MAX`
/// against the sentinel, or for boundaries without a sentinel) the last partition is returned,
/// so the result is always a valid index into a non-empty `boundaries`.
///
/// `boundaries` must be sorted ascending. O(log np), no side effects.
#[inline(always)]
pub fn locate(boundaries: &[i64], key: i64) -> usize {
    let idx = boundaries.partition_point(|&b| b <= key);
    idx.min(boundaries.len().saturating_sub(1))
}

/// Checks that `boundaries` is non-decreasing and ends with the `i64::MAX` sentinel.
pub fn check_boundaries(boundaries: &[i64]) -> Result<(), PartitionError> {
    if let Some(i) = boundaries.windows(2).position(|w| w[1] < w[0]) {
        return Err(PartitionError::UnsortedBoundaries { index: i + 1 });
    }

    match boundaries.last() {
        Some(&i64::MAX) => Ok(()),
        Some(&last) => Err(PartitionError::MissingSentinel { last }),
        None => Err(PartitionError::PartitionCount {
            np: 0,
            max: crate::MAX_PARTITIONS,
        }),
    }
}
