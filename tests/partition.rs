use multi_partition::{
    gen::{random_boundaries, random_keys},
    locate,
    verify::{is_permutation, verify_partitions},
    MultiPartitioner, PartitionError, Scatter, Scheduler, Strategy, MAX_THREADS,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const SCHEDULERS: [Scheduler; 3] = [Scheduler::Sequential, Scheduler::Raw, Scheduler::Rayon];
const STRATEGIES: [Strategy; 2] = [Strategy::TwoPass, Strategy::Fused];
const SCATTERS: [Scatter; 2] = [Scatter::Serial, Scatter::Parallel];

fn partition_with(
    partitioner: MultiPartitioner,
    input: &[i64],
    boundaries: &[i64],
) -> (Vec<i64>, Vec<usize>) {
    let mut output = vec![0i64; input.len()];
    let mut positions = vec![0usize; boundaries.len()];
    partitioner
        .partition(input, boundaries, &mut output, &mut positions)
        .unwrap();

    (output, positions)
}

/// Each partition's keys, sorted, so results can be compared regardless of intra-partition order.
fn decompose(output: &[i64], positions: &[usize]) -> Vec<Vec<i64>> {
    let mut parts = Vec::with_capacity(positions.len());
    for (i, &start) in positions.iter().enumerate() {
        let end = positions.get(i + 1).copied().unwrap_or(output.len());
        let mut part = output[start..end].to_vec();
        part.sort_unstable();
        parts.push(part);
    }

    parts
}

fn assert_valid(input: &[i64], boundaries: &[i64], output: &[i64], positions: &[usize]) {
    assert_eq!(verify_partitions(input, boundaries, output, positions), Ok(()));
    assert!(is_permutation(input, output));
    assert_eq!(positions[0], 0);
    assert!(positions.windows(2).all(|w| w[0] <= w[1]));

    // Completeness: the partition sizes add up to n
    let sizes: usize = positions
        .windows(2)
        .map(|w| w[1] - w[0])
        .chain(std::iter::once(input.len() - positions[positions.len() - 1]))
        .sum();
    assert_eq!(sizes, input.len());
}

#[test]
fn reference_scenario_under_every_configuration() {
    let input = [5, 1, 9, 3, 7];
    let boundaries = [4, 8, i64::MAX];

    for scheduler in SCHEDULERS {
        for strategy in STRATEGIES {
            for scatter in SCATTERS {
                for threads in [1, 2, 3, 5, 8, MAX_THREADS] {
                    let partitioner = MultiPartitioner::new(threads)
                        .with_scheduler(scheduler)
                        .with_strategy(strategy)
                        .with_scatter(scatter);
                    let (output, positions) = partition_with(partitioner, &input, &boundaries);

                    assert_eq!(positions, [0, 2, 4]);
                    assert_eq!(decompose(&output, &positions), [vec![1, 3], vec![5, 7], vec![9]]);
                }
            }
        }
    }
}

#[test]
fn random_inputs_are_partitioned_correctly() {
    let mut rng = StdRng::seed_from_u64(0x5EED);

    for (n, np) in [(1, 1), (10, 3), (1_000, 1), (1_000, 17), (50_000, 256), (20_000, 5_000)] {
        let input = random_keys(n, &mut rng);
        let boundaries = random_boundaries(np, &mut rng);

        for threads in [1, 4, 7] {
            let (output, positions) =
                partition_with(MultiPartitioner::new(threads), &input, &boundaries);
            assert_valid(&input, &boundaries, &output, &positions);
        }
    }
}

#[test]
fn result_does_not_depend_on_thread_count_or_configuration() {
    let mut rng = StdRng::seed_from_u64(42);
    let input = random_keys(30_000, &mut rng);
    let boundaries = random_boundaries(64, &mut rng);

    let (expected_output, expected_positions) =
        partition_with(MultiPartitioner::new(1), &input, &boundaries);
    let expected = decompose(&expected_output, &expected_positions);

    for scheduler in SCHEDULERS {
        for strategy in STRATEGIES {
            for scatter in SCATTERS {
                for threads in [2, 3, 16, MAX_THREADS] {
                    let partitioner = MultiPartitioner::new(threads)
                        .with_scheduler(scheduler)
                        .with_strategy(strategy)
                        .with_scatter(scatter);
                    let (output, positions) = partition_with(partitioner, &input, &boundaries);

                    assert_eq!(positions, expected_positions);
                    assert_eq!(decompose(&output, &positions), expected);
                    // Both scatters keep input order, so even the layout is identical
                    assert_eq!(output, expected_output);
                }
            }
        }
    }
}

#[test]
fn more_threads_than_keys() {
    let input = [3, -1, 8];
    let boundaries = [0, 5, i64::MAX];

    for scatter in SCATTERS {
        let partitioner = MultiPartitioner::new(MAX_THREADS).with_scatter(scatter);
        let (output, positions) = partition_with(partitioner, &input, &boundaries);

        assert_eq!(positions, [0, 1, 2]);
        assert_eq!(output, [-1, 3, 8]);
    }
}

#[test]
fn heavy_duplicates_and_boundary_valued_keys() {
    let boundaries = [10, 10, 20, i64::MAX];
    let mut input = vec![10i64; 500];
    input.extend(std::iter::repeat(20).take(300));
    input.extend(std::iter::repeat(9).take(200));

    let (output, positions) =
        partition_with(MultiPartitioner::new(6), &input, &boundaries);

    // 9 -> 0, 10 -> 2 (both copies of 10 are skipped), 20 -> 3
    assert_eq!(positions, [0, 200, 200, 700]);
    assert_valid(&input, &boundaries, &output, &positions);
}

#[test]
fn every_key_lands_in_its_located_partition() {
    let mut rng = StdRng::seed_from_u64(7);
    let boundaries = random_boundaries(100, &mut rng);
    let input: Vec<i64> = (0..5_000)
        .map(|_| match rng.random_range(0..4) {
            // Mix in exact boundary values and extremes
            0 => boundaries[rng.random_range(0..boundaries.len())],
            1 => i64::MIN,
            _ => rng.random(),
        })
        .collect();

    let (output, positions) = partition_with(
        MultiPartitioner::new(5).with_strategy(Strategy::Fused),
        &input,
        &boundaries,
    );

    for (p, &start) in positions.iter().enumerate() {
        let end = positions.get(p + 1).copied().unwrap_or(output.len());
        for &key in &output[start..end] {
            assert_eq!(locate(&boundaries, key), p);
        }
    }
}

#[test]
fn concurrent_invocations_on_independent_buffers() {
    let handles: Vec<_> = (0..4u64)
        .map(|seed| {
            std::thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                let input = random_keys(10_000, &mut rng);
                let boundaries = random_boundaries(32, &mut rng);
                let (output, positions) =
                    partition_with(MultiPartitioner::new(4), &input, &boundaries);
                assert_valid(&input, &boundaries, &output, &positions);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn failed_call_leaves_output_untouched() {
    let input = [1i64, 2, 3];
    let mut output = [-1i64; 3];
    let mut positions = [usize::MAX; 2];

    let err = MultiPartitioner::new(2)
        .partition(&input, &[2, 1], &mut output, &mut positions)
        .unwrap_err();
    assert!(matches!(err, PartitionError::UnsortedBoundaries { .. }));
    assert_eq!(output, [-1; 3]);
    assert_eq!(positions, [usize::MAX; 2]);
}
