//! # multi_partition
//!
//! Parallel multi-way partitioning of `i64` keys into boundary-defined buckets.
//!
//! Given an unordered input and a sorted array of `np` boundaries whose last element is
//! `i64::MAX`, every key is moved into a single output buffer so that partition `i` occupies
//! `output[positions[i]..positions[i + 1]]` and holds exactly the keys `k` with
//! `boundaries[i - 1] <= k < boundaries[i]`.
//!
//! ## Usage
//!
//! ```
//! use multi_partition::multi_partition;
//!
//! let input = [5, 1, 9, 3, 7];
//! let boundaries = [4, 8, i64::MAX];
//! let mut output = [0i64; 5];
//! let mut positions = [0usize; 3];
//!
//! multi_partition(&input, &boundaries, &mut output, &mut positions, 2).unwrap();
//!
//! assert_eq!(positions, [0, 2, 4]);
//! assert_eq!(output, [1, 3, 5, 7, 9]);
//! ```
//!
//! ## Phases
//!
//! The work runs as a sequence of phases, each joined before the next one starts:
//!
//!  * counting: each worker builds a private histogram of its slice of the input
//!  * merge: local histograms are summed and turned into a displacement table
//!  * classification: each worker records the partition index of every key in its slice
//!  * scatter: keys are written to their final position using one cursor per partition
//!
//! No locks or atomics are used. Every worker writes to memory that no other worker can see.
//! See [`MultiPartitioner`] for the knobs (scheduler, fused counting, parallel scatter).

use std::time::{Duration, Instant};

pub mod chrono;
pub mod error;
pub mod gen;
pub mod histogram;
pub mod locate;
pub mod par;
pub mod partitioner;
pub mod scatter;
pub mod util;
pub mod verify;
pub mod worker;

pub use error::PartitionError;
pub use locate::locate;
pub use par::Scheduler;
pub use partitioner::{multi_partition, MultiPartitioner, Scatter, Strategy};

/// Upper bound on worker threads for a single call.
pub const MAX_THREADS: usize = 64;

/// Upper bound on the number of partitions for a single call.
pub const MAX_PARTITIONS: usize = 100_000;

#[doc(hidden)]
#[cfg(feature = "profile")]
pub use profiling as __profiling;

#[cfg(feature = "profile")]
#[macro_export]
macro_rules! scope {
    ($name:expr) => {
        $crate::__profiling::scope!($name);
    };
}

#[cfg(not(feature = "profile"))]
#[macro_export]
macro_rules! scope {
    ($name:expr) => {};
}

/// Prints the time spent in the enclosing block. Only active with the `scope_print` feature.
#[cfg(feature = "scope_print")]
#[macro_export]
macro_rules! scope_print {
    ($name:expr) => {
        $crate::scope!($name);
        let _scope_print = $crate::ScopePrint::new($name);
    };
}

#[cfg(not(feature = "scope_print"))]
#[macro_export]
macro_rules! scope_print {
    ($name:expr) => {
        $crate::scope!($name);
    };
}

/// Like `scope_print!`, but also active with just the `scope_print_major` feature.
#[cfg(feature = "scope_print_major")]
#[macro_export]
macro_rules! scope_print_major {
    ($name:expr) => {
        $crate::scope!($name);
        let _scope_print_major = $crate::ScopePrint::new($name);
    };
}

#[cfg(not(feature = "scope_print_major"))]
#[macro_export]
macro_rules! scope_print_major {
    ($name:expr) => {
        $crate::scope!($name);
    };
}

/// Guard that prints its label and elapsed time when dropped.
#[doc(hidden)]
pub struct ScopePrint {
    name: &'static str,
    start: Instant,
}

impl ScopePrint {
    #[inline(always)]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }
}

impl Drop for ScopePrint {
    fn drop(&mut self) {
        println!("{:>12} {}", PrettyDuration(self.start.elapsed()), self.name);
    }
}

/// A wrapper struct for `std::time::Duration` to provide pretty-printing of durations.
#[doc(hidden)]
pub struct PrettyDuration(pub Duration);

impl std::fmt::Display for PrettyDuration {
    /// Durations are formatted as follows:
    /// - If the duration is greater than or equal to 1 second, it is formatted in seconds (s).
    /// - If the duration is greater than or equal to 1 millisecond but less than 1 second, it is formatted in milliseconds (ms).
    /// - If the duration is less than 1 millisecond, it is formatted in microseconds (µs).
    ///   In the case of seconds & milliseconds, the duration is always printed with a precision of two decimal places.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let duration = self.0;
        if duration.as_secs() > 0 {
            let seconds =
                duration.as_secs() as f64 + f64::from(duration.subsec_nanos()) / 1_000_000_000.0;
            write!(f, "{seconds:.2}s ")
        } else if duration.subsec_millis() > 0 {
            let milliseconds =
                duration.as_millis() as f64 + f64::from(duration.subsec_micros() % 1_000) / 1_000.0;
            write!(f, "{milliseconds:.2}ms")
        } else {
            let microseconds = duration.as_micros();
            write!(f, "{microseconds}µs")
        }
    }
}
