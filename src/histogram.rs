//! Per-worker histograms and the displacement table built from them.
//!
//! Each worker of the counting phase owns one row of [`LocalHistograms`]. Once every worker has
//! been joined the rows are summed into a global histogram, and an exclusive prefix sum over the
//! global histogram gives the start offset of every partition in the output.

use std::slice::ChunksExactMut;

use crate::util::try_filled_vec;
use crate::PartitionError;

/// `workers` rows of exactly `partitions` counters, stored in one allocation.
pub struct LocalHistograms {
    counts: Vec<usize>,
    partitions: usize,
}

impl LocalHistograms {
    pub fn try_new(workers: usize, partitions: usize) -> Result<Self, PartitionError> {
        let len = workers
            .checked_mul(partitions)
            .ok_or(PartitionError::PartitionCount {
                np: partitions,
                max: crate::MAX_PARTITIONS,
            })?;

        Ok(Self {
            counts: try_filled_vec(len)?,
            partitions,
        })
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.counts.len() / self.partitions.max(1)
    }

    #[inline]
    pub fn partitions(&self) -> usize {
        self.partitions
    }

    #[inline]
    pub fn row(&self, worker: usize) -> &[usize] {
        let start = worker * self.partitions;
        &self.counts[start..start + self.partitions]
    }

    /// Disjoint mutable rows, one per worker, in worker order.
    #[inline]
    pub fn rows_mut(&mut self) -> ChunksExactMut<'_, usize> {
        self.counts.chunks_exact_mut(self.partitions.max(1))
    }

    /// Sums every row into `global`, which must hold `partitions` counters.
    pub fn merge_into(&self, global: &mut [usize]) {
        crate::scope!("merge_counts");
        debug_assert_eq!(global.len(), self.partitions);
        merge_counts(global, self.counts.chunks_exact(self.partitions.max(1)));
    }
}

/// Adds every local histogram into `global`.
#[inline]
pub fn merge_counts<'a, I>(global: &mut [usize], local_counts: I)
where
    I: IntoIterator<Item = &'a [usize]>,
{
    for local in local_counts {
        for (g, l) in global.iter_mut().zip(local) {
            *g += *l;
        }
    }
}

/// Writes the exclusive prefix sum of `counts` into `starts` and returns the total.
///
/// `starts[0] == 0` and `starts[i] == starts[i - 1] + counts[i - 1]`.
#[inline]
pub fn displacements(counts: &[usize], starts: &mut [usize]) -> usize {
    crate::scope!("displacements");
    debug_assert_eq!(counts.len(), starts.len());

    let mut running_total = 0;
    for (d, c) in starts.iter_mut().zip(counts) {
        *d = running_total;
        running_total += c;
    }

    running_total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_disjoint_and_sized_to_partitions() {
        let mut local = LocalHistograms::try_new(3, 4).unwrap();
        assert_eq!(local.workers(), 3);
        assert_eq!(local.partitions(), 4);

        for (t, row) in local.rows_mut().enumerate() {
            assert_eq!(row.len(), 4);
            row[t] += t + 1;
        }

        assert_eq!(local.row(0), [1, 0, 0, 0]);
        assert_eq!(local.row(1), [0, 2, 0, 0]);
        assert_eq!(local.row(2), [0, 0, 3, 0]);
    }

    #[test]
    fn merge_sums_every_worker() {
        let mut local = LocalHistograms::try_new(2, 3).unwrap();
        let mut rows = local.rows_mut();
        rows.next().unwrap().copy_from_slice(&[1, 0, 4]);
        rows.next().unwrap().copy_from_slice(&[2, 3, 0]);

        let mut global = [0usize; 3];
        local.merge_into(&mut global);
        assert_eq!(global, [3, 3, 4]);
    }

    #[test]
    fn displacements_are_exclusive_prefix_sums() {
        let counts = [2, 0, 2, 1];
        let mut positions = [usize::MAX; 4];
        let total = displacements(&counts, &mut positions);

        assert_eq!(positions, [0, 2, 2, 4]);
        assert_eq!(total, 5);
        assert_eq!(positions[3] + counts[3], total);
    }

    #[test]
    fn single_partition_starts_at_zero() {
        let mut positions = [9usize];
        assert_eq!(displacements(&[7], &mut positions), 7);
        assert_eq!(positions, [0]);
    }
}
