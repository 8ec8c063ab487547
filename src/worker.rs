//! Worker descriptors for the parallel phases.
//!
//! A descriptor carries a worker's `[start, end)` range into the input, shared read-only views of
//! the input and boundaries, and the exclusive output slot of its phase. Each phase has its own
//! descriptor type so no field is meaningless in any phase. Descriptors borrow the scratch they
//! write into, so they cannot outlive it.

use std::ops::Range;

use crate::{
    histogram::LocalHistograms, locate::locate, par::Scheduler, util::try_with_capacity,
    PartitionError,
};

/// Splits `[0, n)` into `workers` contiguous ranges of `ceil(n / workers)` keys.
///
/// The last non-empty range is clipped to `n`. When `workers > n` the trailing ranges are empty.
pub fn chunk_ranges(n: usize, workers: usize) -> impl Iterator<Item = Range<usize>> + Clone {
    let chunk_size = n.div_ceil(workers.max(1));
    (0..workers).map(move |t| {
        let start = (t * chunk_size).min(n);
        let end = ((t + 1) * chunk_size).min(n);
        start..end
    })
}

/// Counting phase: builds a private histogram of `input[range]`.
pub struct CountWorker<'a> {
    pub range: Range<usize>,
    pub input: &'a [i64],
    pub boundaries: &'a [i64],
    pub histogram: &'a mut [usize],
}

impl CountWorker<'_> {
    #[inline]
    pub fn run(&mut self) {
        crate::scope!("count worker");
        for &key in &self.input[self.range.clone()] {
            self.histogram[locate(self.boundaries, key)] += 1;
        }
    }
}

/// Classification phase: records the partition index of every key in `input[range]`.
///
/// `classes` is this worker's own sub-slice of the classification array, the same length as
/// `range`.
pub struct ClassifyWorker<'a> {
    pub range: Range<usize>,
    pub input: &'a [i64],
    pub boundaries: &'a [i64],
    pub classes: &'a mut [u32],
}

impl ClassifyWorker<'_> {
    #[inline]
    pub fn run(&mut self) {
        crate::scope!("classify worker");
        let keys = &self.input[self.range.clone()];
        for (class, &key) in self.classes.iter_mut().zip(keys) {
            *class = locate(self.boundaries, key) as u32;
        }
    }
}

/// Fused counting and classification: one pass that fills both the histogram and the
/// classification sub-slice.
pub struct CountClassifyWorker<'a> {
    pub range: Range<usize>,
    pub input: &'a [i64],
    pub boundaries: &'a [i64],
    pub histogram: &'a mut [usize],
    pub classes: &'a mut [u32],
}

impl CountClassifyWorker<'_> {
    #[inline]
    pub fn run(&mut self) {
        crate::scope!("count classify worker");
        let keys = &self.input[self.range.clone()];
        for (class, &key) in self.classes.iter_mut().zip(keys) {
            let p = locate(self.boundaries, key);
            self.histogram[p] += 1;
            *class = p as u32;
        }
    }
}

pub fn count_workers<'a>(
    input: &'a [i64],
    boundaries: &'a [i64],
    histograms: &'a mut LocalHistograms,
) -> Result<Vec<CountWorker<'a>>, PartitionError> {
    let ranges = chunk_ranges(input.len(), histograms.workers());
    let mut workers = try_with_capacity(histograms.workers())?;
    workers.extend(
        ranges
            .zip(histograms.rows_mut())
            .map(|(range, histogram)| CountWorker {
                range,
                input,
                boundaries,
                histogram,
            }),
    );

    Ok(workers)
}

pub fn classify_workers<'a>(
    input: &'a [i64],
    boundaries: &'a [i64],
    classes: &'a mut [u32],
    worker_count: usize,
) -> Result<Vec<ClassifyWorker<'a>>, PartitionError> {
    debug_assert_eq!(input.len(), classes.len());
    let mut workers = try_with_capacity(worker_count)?;
    let mut rest = classes;
    for range in chunk_ranges(input.len(), worker_count) {
        let (classes, right) = rest.split_at_mut(range.len());
        rest = right;
        workers.push(ClassifyWorker {
            range,
            input,
            boundaries,
            classes,
        });
    }

    Ok(workers)
}

pub fn count_classify_workers<'a>(
    input: &'a [i64],
    boundaries: &'a [i64],
    histograms: &'a mut LocalHistograms,
    classes: &'a mut [u32],
) -> Result<Vec<CountClassifyWorker<'a>>, PartitionError> {
    debug_assert_eq!(input.len(), classes.len());
    let worker_count = histograms.workers();
    let mut workers = try_with_capacity(worker_count)?;
    let mut rest = classes;
    for (range, histogram) in chunk_ranges(input.len(), worker_count).zip(histograms.rows_mut()) {
        let (classes, right) = rest.split_at_mut(range.len());
        rest = right;
        workers.push(CountClassifyWorker {
            range,
            input,
            boundaries,
            histogram,
            classes,
        });
    }

    Ok(workers)
}

/// Runs every counting worker and returns once all of them have been joined.
pub fn run_count_phase(scheduler: Scheduler, workers: &mut [CountWorker<'_>]) {
    crate::scope_print!("count phase");
    let chunks = workers.len();
    scheduler.par_map(workers, &|_, worker| worker.run(), chunks);
}

/// Runs every classification worker and returns once all of them have been joined.
pub fn run_classify_phase(scheduler: Scheduler, workers: &mut [ClassifyWorker<'_>]) {
    crate::scope_print!("classify phase");
    let chunks = workers.len();
    scheduler.par_map(workers, &|_, worker| worker.run(), chunks);
}

/// Runs every fused worker and returns once all of them have been joined.
pub fn run_count_classify_phase(scheduler: Scheduler, workers: &mut [CountClassifyWorker<'_>]) {
    crate::scope_print!("count classify phase");
    let chunks = workers.len();
    scheduler.par_map(workers, &|_, worker| worker.run(), chunks);
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARIES: [i64; 3] = [4, 8, i64::MAX];
    const INPUT: [i64; 5] = [5, 1, 9, 3, 7];

    #[test]
    fn chunk_ranges_cover_input_exactly() {
        let ranges: Vec<_> = chunk_ranges(10, 3).collect();
        assert_eq!(ranges, [0..4, 4..8, 8..10]);

        let ranges: Vec<_> = chunk_ranges(10, 1).collect();
        assert_eq!(ranges, [0..10]);
    }

    #[test]
    fn chunk_ranges_with_more_workers_than_keys() {
        let ranges: Vec<_> = chunk_ranges(2, 5).collect();
        assert_eq!(ranges, [0..1, 1..2, 2..2, 2..2, 2..2]);
    }

    #[test]
    fn chunk_ranges_last_chunk_may_be_empty() {
        // ceil(9 / 4) = 3, so the fourth worker gets nothing
        let ranges: Vec<_> = chunk_ranges(9, 4).collect();
        assert_eq!(ranges, [0..3, 3..6, 6..9, 9..9]);
    }

    #[test]
    fn count_phase_fills_private_histograms() {
        let mut histograms = LocalHistograms::try_new(2, BOUNDARIES.len()).unwrap();
        {
            let mut workers = count_workers(&INPUT, &BOUNDARIES, &mut histograms).unwrap();
            assert_eq!(workers[0].range, 0..3);
            assert_eq!(workers[1].range, 3..5);
            run_count_phase(Scheduler::Raw, &mut workers);
        }

        // Worker 0 saw 5, 1, 9 and worker 1 saw 3, 7
        assert_eq!(histograms.row(0), [1, 1, 1]);
        assert_eq!(histograms.row(1), [1, 1, 0]);
    }

    #[test]
    fn classify_phase_records_every_key() {
        let mut classes = vec![u32::MAX; INPUT.len()];
        {
            let mut workers = classify_workers(&INPUT, &BOUNDARIES, &mut classes, 4).unwrap();
            assert_eq!(workers.len(), 4);
            run_classify_phase(Scheduler::Rayon, &mut workers);
        }

        assert_eq!(classes, [1, 0, 2, 0, 1]);
    }

    #[test]
    fn fused_phase_matches_separate_phases() {
        let mut histograms = LocalHistograms::try_new(3, BOUNDARIES.len()).unwrap();
        let mut classes = vec![0u32; INPUT.len()];
        {
            let mut workers =
                count_classify_workers(&INPUT, &BOUNDARIES, &mut histograms, &mut classes)
                    .unwrap();
            run_count_classify_phase(Scheduler::Sequential, &mut workers);
        }

        assert_eq!(classes, [1, 0, 2, 0, 1]);
        let mut global = [0usize; 3];
        histograms.merge_into(&mut global);
        assert_eq!(global, [2, 2, 1]);
    }

    #[test]
    fn empty_ranges_leave_histograms_zeroed() {
        let input = [42i64];
        let boundaries = [i64::MAX];
        let mut histograms = LocalHistograms::try_new(8, 1).unwrap();
        {
            let mut workers = count_workers(&input, &boundaries, &mut histograms).unwrap();
            run_count_phase(Scheduler::Raw, &mut workers);
        }

        assert_eq!(histograms.row(0), [1]);
        for t in 1..8 {
            assert_eq!(histograms.row(t), [0]);
        }
    }
}
