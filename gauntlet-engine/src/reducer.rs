//! Statistics reducer

use crate::driver::DriverReport;
use gauntlet_core::{FailureKind, LatencyStats, Outcome, Summary};
use std::collections::BTreeMap;
use std::time::Duration;

/// Folds outcomes into a [`Summary`].
///
/// The result depends only on the multiset of outcomes pushed, never on their
/// order: latencies are sorted before ranking and the mean is taken over an
/// exact nanosecond sum.
#[derive(Debug, Clone)]
pub struct SummaryReducer {
    scenario: String,
    framework: String,
    latencies: Vec<Duration>,
    latency_sum_nanos: u128,
    failures: u64,
    failure_breakdown: BTreeMap<FailureKind, u64>,
    status_codes: BTreeMap<u16, u64>,
}

impl SummaryReducer {
    pub fn new(scenario: impl Into<String>, framework: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            framework: framework.into(),
            latencies: Vec::new(),
            latency_sum_nanos: 0,
            failures: 0,
            failure_breakdown: BTreeMap::new(),
            status_codes: BTreeMap::new(),
        }
    }

    /// Pre-size the latency buffer for an expected number of outcomes
    pub fn with_capacity(mut self, outcomes: u64) -> Self {
        self.latencies
            .reserve(usize::try_from(outcomes).unwrap_or(0));
        self
    }

    pub fn push(&mut self, outcome: Outcome) {
        if let Some(status) = outcome.status() {
            *self.status_codes.entry(status).or_insert(0) += 1;
        }

        match outcome.failure() {
            None => {
                self.latencies.push(outcome.elapsed());
                self.latency_sum_nanos += outcome.elapsed().as_nanos();
            }
            Some(kind) => {
                self.failures += 1;
                *self.failure_breakdown.entry(kind).or_insert(0) += 1;
            }
        }
    }

    pub fn completed(&self) -> u64 {
        self.latencies.len() as u64 + self.failures
    }

    /// Reduce everything pushed so far, using the driver's counters for
    /// wall clock and cancellation
    pub fn finish(self, report: &DriverReport) -> Summary {
        self.finish_with(report.requested, report.wall_clock, report.cancelled)
    }

    pub fn finish_with(mut self, requested: u64, wall_clock: Duration, cancelled: bool) -> Summary {
        let completed = self.completed();
        let successes = self.latencies.len() as u64;

        let requests_per_sec = if wall_clock.is_zero() {
            0.0
        } else {
            completed as f64 / wall_clock.as_secs_f64()
        };

        let latency = if self.latencies.is_empty() {
            None
        } else {
            self.latencies.sort_unstable();
            let mean_nanos = self.latency_sum_nanos / self.latencies.len() as u128;
            Some(LatencyStats {
                mean: duration_from_nanos(mean_nanos),
                min: self.latencies[0],
                max: self.latencies[self.latencies.len() - 1],
                p50: percentile(&self.latencies, 50.0),
                p90: percentile(&self.latencies, 90.0),
                p99: percentile(&self.latencies, 99.0),
            })
        };

        Summary {
            scenario: self.scenario,
            framework: self.framework,
            requested,
            completed,
            successes,
            failures: self.failures,
            wall_clock,
            requests_per_sec,
            degenerate: latency.is_none(),
            latency,
            failure_breakdown: self.failure_breakdown,
            status_codes: self.status_codes,
            cancelled,
        }
    }
}

/// Nearest-rank percentile of an ascending slice.
///
/// `rank = ceil(q / 100 * n)`, clamped to `1..=n`. Returns zero for an empty
/// slice.
pub fn percentile(sorted: &[Duration], q: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let n = sorted.len();
    let rank = (q / 100.0 * n as f64).ceil() as usize;
    sorted[rank.clamp(1, n) - 1]
}

fn duration_from_nanos(nanos: u128) -> Duration {
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}
