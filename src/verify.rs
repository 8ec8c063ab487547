//! Checking a partitioned output against its boundaries.
//!
//! The engine never calls into this module; it is used by the driver after the benchmark loop
//! and by tests.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("positions holds {actual} entries for {expected} boundaries")]
    PositionsLength { expected: usize, actual: usize },

    #[error("output holds {actual} keys for an input of {expected}")]
    OutputLength { expected: usize, actual: usize },

    #[error("first partition starts at {found} instead of 0")]
    FirstPosition { found: usize },

    #[error("positions[{index}] = {position} is out of order or past the end of the output")]
    Position { index: usize, position: usize },

    #[error("output[{index}] = {key} in partition {partition} is not below boundary {boundary}")]
    AboveBoundary {
        partition: usize,
        index: usize,
        key: i64,
        boundary: i64,
    },

    #[error("output[{index}] = {key} in partition {partition} is below the previous boundary {boundary}")]
    BelowBoundary {
        partition: usize,
        index: usize,
        key: i64,
        boundary: i64,
    },
}

/// Checks that `output` and `positions` describe a valid partitioning for `boundaries`.
///
/// Verified:
///
///  * `positions[0] == 0` and `positions` is non-decreasing and within the output
///  * every key in partition `i < np - 1` is strictly below `boundaries[i]`
///  * every key in partition `i > 0` is at least `boundaries[i - 1]`
///
/// Whether `output` is a permutation of `input` is checked separately by [`is_permutation`].
pub fn verify_partitions(
    input: &[i64],
    boundaries: &[i64],
    output: &[i64],
    positions: &[usize],
) -> Result<(), VerifyError> {
    crate::scope_print!("verify_partitions");
    let n = input.len();
    let np = boundaries.len();

    if positions.len() != np {
        return Err(VerifyError::PositionsLength {
            expected: np,
            actual: positions.len(),
        });
    }
    if output.len() != n {
        return Err(VerifyError::OutputLength {
            expected: n,
            actual: output.len(),
        });
    }

    match positions.first() {
        Some(&0) | None => {}
        Some(&found) => return Err(VerifyError::FirstPosition { found }),
    }

    for index in 1..np {
        let position = positions[index];
        if position < positions[index - 1] || position > n {
            return Err(VerifyError::Position { index, position });
        }
    }

    for p in 0..np {
        let start = positions[p];
        let end = positions.get(p + 1).copied().unwrap_or(n);

        for (index, &key) in output.iter().enumerate().take(end).skip(start) {
            if p + 1 < np && key >= boundaries[p] {
                return Err(VerifyError::AboveBoundary {
                    partition: p,
                    index,
                    key,
                    boundary: boundaries[p],
                });
            }
            if p > 0 && key < boundaries[p - 1] {
                return Err(VerifyError::BelowBoundary {
                    partition: p,
                    index,
                    key,
                    boundary: boundaries[p - 1],
                });
            }
        }
    }

    Ok(())
}

/// True if `output` holds exactly the same multiset of keys as `input`.
pub fn is_permutation(input: &[i64], output: &[i64]) -> bool {
    if input.len() != output.len() {
        return false;
    }

    let mut a = input.to_vec();
    let mut b = output.to_vec();
    a.sort_unstable();
    b.sort_unstable();

    a == b
}
