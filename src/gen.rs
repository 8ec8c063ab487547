//! Random test vectors for the driver, tests and benchmarks.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::par::{cached_available_parallelism, Scheduler};

/// Keys handed out per rng when generating in parallel. Fixed so the output for a given seed
/// does not depend on the scheduler or thread count.
const PAR_GEN_CHUNK: usize = 1 << 16;

/// One random key: `a * 100 + b` with `a` and `b` uniform in `[0, i32::MAX]`.
#[inline]
pub fn random_key<R: Rng + ?Sized>(rng: &mut R) -> i64 {
    let a = rng.random_range(0..=i32::MAX as i64);
    let b = rng.random_range(0..=i32::MAX as i64);
    a * 100 + b
}

pub fn random_keys<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<i64> {
    (0..n).map(|_| random_key(rng)).collect()
}

/// `np` sorted random boundaries, the last one being the `i64::MAX` sentinel.
pub fn random_boundaries<R: Rng + ?Sized>(np: usize, rng: &mut R) -> Vec<i64> {
    let mut boundaries = random_keys(np, rng);
    if let Some(last) = boundaries.last_mut() {
        *last = i64::MAX;
    }
    boundaries.sort_unstable();

    boundaries
}

/// Fills `keys` with random keys in parallel, deterministically for a given `seed`.
pub fn par_fill_random_keys(scheduler: Scheduler, keys: &mut [i64], seed: u64) {
    crate::scope_print_major!("par_fill_random_keys");
    // One entry per rng, spread over at most as many workers as there are cores
    let mut chunks: Vec<&mut [i64]> = keys.chunks_mut(PAR_GEN_CHUNK).collect();
    scheduler.par_map(
        &mut chunks,
        &|chunk_id, chunk| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(chunk_id as u64));
            for key in chunk.iter_mut() {
                *key = random_key(&mut rng);
            }
        },
        cached_available_parallelism(),
    );
}
