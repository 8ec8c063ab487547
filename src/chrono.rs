//! A small stopwatch for measuring repeated operations.

use std::{
    fmt,
    time::{Duration, Instant},
};

use crate::PrettyDuration;

/// Accumulates time over any number of start/stop pairs, counting each stop as one event.
#[derive(Default, Debug, Clone)]
pub struct Chronometer {
    started: Option<Instant>,
    total: Duration,
    events: u64,
}

impl Chronometer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the accumulated time and event count.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Adds the time since the last `start` and counts one event. Does nothing if not started.
    pub fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            self.total += started.elapsed();
            self.events += 1;
        }
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn total_ns(&self) -> u128 {
        self.total.as_nanos()
    }

    pub fn events(&self) -> u64 {
        self.events
    }

    /// Summary with the mean time per event.
    pub fn report<'a>(&'a self, label: &'a str) -> ChronoReport<'a> {
        ChronoReport {
            label,
            total: self.total,
            ops: self.events,
        }
    }

    /// Summary with the mean time per iteration when each event covered `loop_count` iterations.
    pub fn report_in_loop<'a>(&'a self, label: &'a str, loop_count: u64) -> ChronoReport<'a> {
        ChronoReport {
            label,
            total: self.total,
            ops: self.events * loop_count,
        }
    }
}

pub struct ChronoReport<'a> {
    label: &'a str,
    total: Duration,
    ops: u64,
}

impl ChronoReport<'_> {
    pub fn per_op(&self) -> Duration {
        if self.ops == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos((self.total.as_nanos() / self.ops as u128) as u64)
        }
    }
}

impl fmt::Display for ChronoReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} deltaT: {} ({} ns) for {} ops, each op takes {}",
            self.label,
            PrettyDuration(self.total),
            self.total.as_nanos(),
            self.ops,
            PrettyDuration(self.per_op())
        )
    }
}
