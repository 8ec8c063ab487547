//! Moving every key to its final slot in the output.
//!
//! Both variants rely on the same fact: the output range of a partition is disjoint from every
//! other partition's range, so writes for different partitions never overlap. Writes within one
//! partition are serialised, either by running on a single thread ([`scatter_serial`]) or by
//! giving every worker its own sub-range of each partition ([`scatter_parallel`]).
//!
//! Both variants keep the input order within a partition, so they produce identical output.

use std::{mem, ops::Range};

use arbitrary_chunks::ArbitraryChunks;

use crate::{
    histogram::LocalHistograms,
    par::Scheduler,
    util::{try_filled_vec, try_with_capacity},
    worker::chunk_ranges,
    PartitionError,
};

/// Single-threaded scatter with one cursor per partition.
///
/// `cursors` is scratch of the same length as `starts`; it is overwritten.
#[inline]
pub fn scatter_serial(
    input: &[i64],
    classes: &[u32],
    starts: &[usize],
    cursors: &mut [usize],
    output: &mut [i64],
) {
    crate::scope_print!("scatter serial");
    debug_assert_eq!(input.len(), classes.len());
    debug_assert_eq!(input.len(), output.len());

    cursors.copy_from_slice(starts);
    for (&key, &class) in input.iter().zip(classes) {
        let cursor = &mut cursors[class as usize];
        output[*cursor] = key;
        *cursor += 1;
    }
}

/// A worker of the parallel scatter: owns one exclusive output sub-slice per partition.
///
/// `cursors[p]` is the next free slot of `targets[p]`. A key whose partition sub-slice is
/// already full panics on the out-of-bounds write instead of being dropped.
pub struct ScatterWorker<'a> {
    pub range: Range<usize>,
    pub input: &'a [i64],
    pub classes: &'a [u32],
    pub targets: Vec<&'a mut [i64]>,
    pub cursors: Vec<usize>,
}

impl ScatterWorker<'_> {
    #[inline]
    pub fn run(&mut self) {
        crate::scope!("scatter worker");
        let keys = &self.input[self.range.clone()];
        for (&key, &class) in keys.iter().zip(self.classes) {
            let p = class as usize;
            let cursor = &mut self.cursors[p];
            self.targets[p][*cursor] = key;
            *cursor += 1;
        }
    }
}

/// Two-level displacement scatter.
///
/// The output is first cut into one slice per partition using the global histogram, then each
/// partition slice is cut into one sub-slice per worker using that worker's local histogram, in
/// worker order. Worker `t` therefore writes partition `p` starting at
/// `starts[p] + sum(local[s][p] for s < t)`, and no two workers share a slot.
///
/// `local` must be the histograms of the same worker split that produced `classes`.
pub fn scatter_parallel(
    scheduler: Scheduler,
    input: &[i64],
    classes: &[u32],
    global: &[usize],
    local: &LocalHistograms,
    output: &mut [i64],
) -> Result<(), PartitionError> {
    crate::scope_print!("scatter parallel");
    debug_assert_eq!(input.len(), classes.len());
    debug_assert_eq!(input.len(), output.len());
    debug_assert_eq!(global.len(), local.partitions());

    let np = global.len();
    let worker_count = local.workers();

    let mut partitions: Vec<&mut [i64]> = try_with_capacity(np)?;
    partitions.extend(output.arbitrary_chunks_mut(global));
    // Trailing empty partitions may not be yielded once the output is exhausted
    partitions.resize_with(np, Default::default);

    let mut workers = try_with_capacity(worker_count)?;
    for (t, range) in chunk_ranges(input.len(), worker_count).enumerate() {
        let row = local.row(t);
        let mut targets = try_with_capacity(np)?;
        for (partition, &count) in partitions.iter_mut().zip(row) {
            let (head, tail) = mem::take(partition).split_at_mut(count);
            *partition = tail;
            targets.push(head);
        }
        let cursors = try_filled_vec(np)?;

        workers.push(ScatterWorker {
            classes: &classes[range.clone()],
            range,
            input,
            targets,
            cursors,
        });
    }

    scheduler.par_map(&mut workers, &|_, worker| worker.run(), worker_count);

    Ok(())
}
