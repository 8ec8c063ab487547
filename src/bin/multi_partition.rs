//! Benchmark driver: partitions a random input `--times` times and reports throughput.
//!
//! ```text
//! multi-partition <n_total_elements> <n_partitions> <n_threads> [--times 10] [--seed 0]
//!     [--scheduler raw|rayon|seq] [--strategy two-pass|fused] [--scatter serial|parallel]
//! ```
//!
//! No logger is installed, so the engine's `log` records are dropped. Build with
//! `--features scope_print` to print the time spent in each phase.

use std::process::ExitCode;

use argh::FromArgs;
use rand::{rngs::StdRng, SeedableRng};

use multi_partition::{
    chrono::Chronometer,
    error::check_arguments,
    gen::{par_fill_random_keys, random_boundaries},
    par::cached_available_parallelism,
    util::{print_vector, try_filled_vec},
    verify::{is_permutation, verify_partitions},
    MultiPartitioner, Scatter, Scheduler, Strategy,
};

/// Partition random i64 keys into sorted, boundary-defined buckets using worker threads.
#[derive(FromArgs, Debug)]
struct Args {
    /// total number of keys to partition
    #[argh(positional)]
    n_total_elements: usize,

    /// number of partitions
    #[argh(positional)]
    n_partitions: usize,

    /// number of worker threads
    #[argh(positional)]
    n_threads: usize,

    /// how many times the partitioning is repeated
    #[argh(option, default = "10")]
    times: u64,

    /// seed for the random input and boundaries
    #[argh(option, default = "0")]
    seed: u64,

    /// scheduler: raw, rayon or seq
    #[argh(option, default = "Scheduler::Raw")]
    scheduler: Scheduler,

    /// counting strategy: two-pass or fused
    #[argh(option, default = "Strategy::TwoPass")]
    strategy: Strategy,

    /// scatter: serial or parallel
    #[argh(option, default = "Scatter::Serial")]
    scatter: Scatter,

    /// print the input, boundaries, output and positions
    #[argh(switch)]
    print: bool,
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();

    let n = args.n_total_elements;
    let np = args.n_partitions;
    let threads = args.n_threads;

    if let Err(e) = check_arguments(n, np, threads) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    if args.times == 0 {
        eprintln!("error: --times must be at least 1");
        return ExitCode::FAILURE;
    }

    println!("Running with {n} elements, {np} partitions and {threads} threads.");
    if threads > cached_available_parallelism() {
        eprintln!(
            "warning: {threads} threads requested but only {} available",
            cached_available_parallelism()
        );
    }

    let vectors = (
        try_filled_vec::<i64>(n),
        try_filled_vec::<i64>(n),
        try_filled_vec::<usize>(np),
    );
    let (mut input, mut output, mut positions) = match vectors {
        (Ok(input), Ok(output), Ok(positions)) => (input, output, positions),
        _ => {
            eprintln!("error: failed to allocate vectors");
            return ExitCode::FAILURE;
        }
    };

    par_fill_random_keys(args.scheduler, &mut input, args.seed);
    let mut rng = StdRng::seed_from_u64(args.seed ^ 0x9E37_79B9_7F4A_7C15);
    let boundaries = random_boundaries(np, &mut rng);

    println!("\n--- Vectors generated ---");
    if args.print {
        print_vector(&input, Some("Input"));
        print_vector(&boundaries, Some("Boundaries"));
    }

    let partitioner = MultiPartitioner::new(threads)
        .with_scheduler(args.scheduler)
        .with_strategy(args.strategy)
        .with_scatter(args.scatter);

    let mut chrono = Chronometer::new();
    chrono.start();
    for _ in 0..args.times {
        if let Err(e) = partitioner.partition(&input, &boundaries, &mut output, &mut positions) {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    }
    chrono.stop();

    println!("\n--- Vector partitioned ---");
    if args.print {
        print_vector(&output, Some("Output"));
        print_vector(&positions, Some("Positions"));
    }

    let correct = match verify_partitions(&input, &boundaries, &output, &positions) {
        Err(e) => {
            println!("\n===> partitioning has ERRORS: {e}");
            false
        }
        Ok(()) if !is_permutation(&input, &output) => {
            println!("\n===> partitioning has ERRORS: output is not a permutation of input");
            false
        }
        Ok(()) => {
            println!("\n===> partitioning CORRECT");
            true
        }
    };

    println!("{}", chrono.report_in_loop("multi_partition", args.times));

    let total_time_in_seconds = chrono.total().as_secs_f64();
    println!("total_time_in_seconds: {total_time_in_seconds:.6} s");
    let ops = (n as f64 * args.times as f64) / total_time_in_seconds;
    println!("Throughput: {ops:.3} OP/s");

    if correct {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
