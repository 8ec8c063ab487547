use std::collections::TryReserveError;

use thiserror::Error;

use crate::{MAX_PARTITIONS, MAX_THREADS};

/// Everything that can make a partitioning call fail.
///
/// All checks happen before any caller-owned buffer is written, so a call that returns an error
/// leaves `output` and `positions` untouched.
#[derive(Debug, Error)]
pub enum PartitionError {
    #[error("input must contain at least one key")]
    EmptyInput,

    #[error("number of partitions must be between 1 and {max}, got {np}")]
    PartitionCount { np: usize, max: usize },

    #[error("number of threads must be between 1 and {max}, got {threads}")]
    ThreadCount { threads: usize, max: usize },

    #[error("output buffer holds {actual} keys, expected {expected}")]
    OutputLength { expected: usize, actual: usize },

    #[error("positions buffer holds {actual} entries, expected {expected}")]
    PositionsLength { expected: usize, actual: usize },

    #[error("boundaries are not sorted: boundaries[{index}] is smaller than its predecessor")]
    UnsortedBoundaries { index: usize },

    #[error("last boundary must be i64::MAX, got {last}")]
    MissingSentinel { last: i64 },

    #[error("failed to allocate scratch buffers")]
    AllocationFailure(#[from] TryReserveError),
}

impl PartitionError {
    /// True for the errors caused by argument values rather than by boundaries or memory.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput
                | Self::PartitionCount { .. }
                | Self::ThreadCount { .. }
                | Self::OutputLength { .. }
                | Self::PositionsLength { .. }
        )
    }
}

/// Validates the scalar arguments of a call: input size, partition count and thread count.
pub fn check_arguments(n: usize, np: usize, threads: usize) -> Result<(), PartitionError> {
    if n == 0 {
        return Err(PartitionError::EmptyInput);
    }

    if np == 0 || np > MAX_PARTITIONS {
        return Err(PartitionError::PartitionCount {
            np,
            max: MAX_PARTITIONS,
        });
    }

    if threads == 0 || threads > MAX_THREADS {
        return Err(PartitionError::ThreadCount {
            threads,
            max: MAX_THREADS,
        });
    }

    Ok(())
}
