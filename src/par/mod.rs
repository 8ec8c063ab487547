use std::{fmt, str::FromStr, sync::OnceLock};

pub mod par_raw;
pub mod par_rayon;
pub mod par_sequential;

static AVAILABLE_PARALLELISM: OnceLock<usize> = OnceLock::new();

#[inline(always)]
pub fn cached_available_parallelism() -> usize {
    *AVAILABLE_PARALLELISM.get_or_init(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    })
}

/// How the workers of a phase are executed.
///
/// Every scheduler runs the same worker descriptors; they only differ in which threads the
/// descriptors end up on. All of them return only once every worker has finished.
#[derive(PartialEq, Eq, Default, Clone, Copy, Debug)]
#[repr(u32)]
pub enum Scheduler {
    /// Everything runs in order on the calling thread.
    Sequential = 0,
    /// Scoped OS threads, spawned for each phase and joined before it returns.
    #[default]
    Raw = 1,
    /// rayon's global thread pool.
    Rayon = 2,
}

impl FromStr for Scheduler {
    type Err = String;

    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seq" => Ok(Self::Sequential),
            "raw" => Ok(Self::Raw),
            "rayon" => Ok(Self::Rayon),
            _ => Err(format!(
                "Unknown scheduler: '{s}', valid schedulers: 'seq', 'raw', 'rayon'"
            )),
        }
    }
}

impl fmt::Display for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scheduler::Sequential => "seq",
            Scheduler::Raw => "raw",
            Scheduler::Rayon => "rayon",
        })
    }
}

impl Scheduler {
    /// Calls `func(index, item)` for every item, spreading the items over `chunks` workers.
    #[inline(always)]
    pub fn par_map<T, F>(self, data: &mut [T], func: &F, chunks: usize)
    where
        T: Send + Sync,
        F: Fn(usize, &mut T) + Send + Sync,
    {
        match self {
            Scheduler::Sequential => par_sequential::par_map(data, func),
            Scheduler::Raw => par_raw::par_map(data, func, chunks),
            Scheduler::Rayon => par_rayon::par_map(data, func),
        }
    }
}
