use log::{debug, trace};

use crate::{
    error::check_arguments,
    histogram::{displacements, LocalHistograms},
    locate::check_boundaries,
    par::Scheduler,
    scatter::{scatter_parallel, scatter_serial},
    util::try_filled_vec,
    worker::{
        classify_workers, count_classify_workers, count_workers, run_classify_phase,
        run_count_classify_phase, run_count_phase,
    },
    PartitionError,
};

/// How keys are counted and classified.
#[derive(PartialEq, Eq, Default, Clone, Copy, Debug)]
pub enum Strategy {
    /// A counting pass, then a separate classification pass that repeats the binary searches.
    #[default]
    TwoPass,
    /// One pass that counts and records the classification at the same time.
    Fused,
}

/// How keys are moved to the output once every key is classified.
#[derive(PartialEq, Eq, Default, Clone, Copy, Debug)]
pub enum Scatter {
    /// One thread, one cursor per partition.
    #[default]
    Serial,
    /// Every worker scatters its own input range into exclusive sub-ranges of each partition.
    Parallel,
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "two-pass" => Ok(Self::TwoPass),
            "fused" => Ok(Self::Fused),
            _ => Err(format!(
                "Unknown strategy: '{s}', valid strategies: 'two-pass', 'fused'"
            )),
        }
    }
}

impl std::str::FromStr for Scatter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "serial" => Ok(Self::Serial),
            "parallel" => Ok(Self::Parallel),
            _ => Err(format!(
                "Unknown scatter: '{s}', valid scatters: 'serial', 'parallel'"
            )),
        }
    }
}

/// Configuration for a partitioning call.
///
/// ```
/// use multi_partition::{MultiPartitioner, Scatter, Scheduler, Strategy};
///
/// let input = [30, -4, 12, 7, 12, 99];
/// let boundaries = [0, 12, i64::MAX];
/// let mut output = [0i64; 6];
/// let mut positions = [0usize; 3];
///
/// MultiPartitioner::new(4)
///     .with_scheduler(Scheduler::Rayon)
///     .with_strategy(Strategy::Fused)
///     .with_scatter(Scatter::Parallel)
///     .partition(&input, &boundaries, &mut output, &mut positions)
///     .unwrap();
///
/// assert_eq!(positions, [0, 1, 2]);
/// assert_eq!(output, [-4, 7, 30, 12, 12, 99]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MultiPartitioner {
    threads: usize,
    scheduler: Scheduler,
    strategy: Strategy,
    scatter: Scatter,
}

impl MultiPartitioner {
    /// `threads` is the number of workers each parallel phase is split into.
    pub fn new(threads: usize) -> Self {
        Self {
            threads,
            scheduler: Scheduler::default(),
            strategy: Strategy::default(),
            scatter: Scatter::default(),
        }
    }

    pub fn with_scheduler(mut self, scheduler: Scheduler) -> Self {
        self.scheduler = scheduler;

        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;

        self
    }

    pub fn with_scatter(mut self, scatter: Scatter) -> Self {
        self.scatter = scatter;

        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn scheduler(&self) -> Scheduler {
        self.scheduler
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn scatter(&self) -> Scatter {
        self.scatter
    }

    /// Partitions `input` by `boundaries` into `output`, writing each partition's start offset
    /// into `positions`.
    ///
    /// `output` must have the length of `input` and `positions` the length of `boundaries`.
    /// `boundaries` must be sorted and end with `i64::MAX`. On error neither `output` nor
    /// `positions` has been written.
    ///
    /// The configuration is reported at `debug` level and each joined phase at `trace` level
    /// through the `log` facade. Nothing is printed unless the embedding program installs a
    /// logger; phase timings are printed with the `scope_print` features instead.
    pub fn partition(
        &self,
        input: &[i64],
        boundaries: &[i64],
        output: &mut [i64],
        positions: &mut [usize],
    ) -> Result<(), PartitionError> {
        crate::scope_print_major!("multi_partition");
        let n = input.len();
        let np = boundaries.len();
        let threads = self.threads;

        check_arguments(n, np, threads)?;
        if output.len() != n {
            return Err(PartitionError::OutputLength {
                expected: n,
                actual: output.len(),
            });
        }
        if positions.len() != np {
            return Err(PartitionError::PositionsLength {
                expected: np,
                actual: positions.len(),
            });
        }
        check_boundaries(boundaries)?;

        debug!(
            "partitioning {n} keys into {np} partitions with {threads} {} workers ({:?}, {:?} scatter)",
            self.scheduler, self.strategy, self.scatter
        );

        // Every scratch buffer is acquired up front, so a failed allocation leaves the caller's
        // buffers untouched.
        let mut local = LocalHistograms::try_new(threads, np)?;
        let mut global: Vec<usize> = try_filled_vec(np)?;
        let mut starts: Vec<usize> = try_filled_vec(np)?;
        let mut classes: Vec<u32> = try_filled_vec(n)?;
        let mut cursors: Vec<usize> = match self.scatter {
            Scatter::Serial => try_filled_vec(np)?,
            Scatter::Parallel => Vec::new(),
        };

        match self.strategy {
            Strategy::TwoPass => {
                let mut workers = count_workers(input, boundaries, &mut local)?;
                run_count_phase(self.scheduler, &mut workers);
            }
            Strategy::Fused => {
                let mut workers =
                    count_classify_workers(input, boundaries, &mut local, &mut classes)?;
                run_count_classify_phase(self.scheduler, &mut workers);
            }
        }
        trace!("counting joined");

        local.merge_into(&mut global);
        let total = displacements(&global, &mut starts);
        debug_assert_eq!(total, n);
        debug_assert_eq!(starts[np - 1] + global[np - 1], n);

        if self.strategy == Strategy::TwoPass {
            let mut workers = classify_workers(input, boundaries, &mut classes, threads)?;
            run_classify_phase(self.scheduler, &mut workers);
            trace!("classification joined");
        }

        match self.scatter {
            Scatter::Serial => scatter_serial(input, &classes, &starts, &mut cursors, output),
            Scatter::Parallel => {
                scatter_parallel(self.scheduler, input, &classes, &global, &local, output)?
            }
        }
        trace!("scatter joined");

        positions.copy_from_slice(&starts);

        Ok(())
    }
}

/// Partitions `input` by `boundaries` into `output` using `threads` workers and the default
/// configuration (scoped threads, two passes, serial scatter).
///
/// See [`MultiPartitioner::partition`].
pub fn multi_partition(
    input: &[i64],
    boundaries: &[i64],
    output: &mut [i64],
    positions: &mut [usize],
    threads: usize,
) -> Result<(), PartitionError> {
    MultiPartitioner::new(threads).partition(input, boundaries, output, positions)
}
