//! Aggregated results of one benchmark run

use crate::types::FailureKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Latency distribution over successful requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyStats {
    #[serde(with = "crate::serde_utils::duration_ms")]
    pub mean: Duration,
    #[serde(with = "crate::serde_utils::duration_ms")]
    pub min: Duration,
    #[serde(with = "crate::serde_utils::duration_ms")]
    pub max: Duration,
    #[serde(with = "crate::serde_utils::duration_ms")]
    pub p50: Duration,
    #[serde(with = "crate::serde_utils::duration_ms")]
    pub p90: Duration,
    #[serde(with = "crate::serde_utils::duration_ms")]
    pub p99: Duration,
}

/// Summary of one (scenario, framework) run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub scenario: String,
    pub framework: String,

    /// Attempts the run was configured for
    pub requested: u64,

    /// Outcomes actually collected; below `requested` only when cancelled
    pub completed: u64,

    pub successes: u64,
    pub failures: u64,

    /// First dispatch to last completion
    #[serde(with = "crate::serde_utils::duration_ms")]
    pub wall_clock: Duration,

    pub requests_per_sec: f64,

    /// `None` when no request succeeded
    pub latency: Option<LatencyStats>,

    pub failure_breakdown: BTreeMap<FailureKind, u64>,
    pub status_codes: BTreeMap<u16, u64>,

    /// Zero successful outcomes; latency figures are meaningless
    pub degenerate: bool,

    pub cancelled: bool,
}

impl Summary {
    /// Mean latency, zero for a degenerate summary
    pub fn mean_latency(&self) -> Duration {
        self.latency.map(|l| l.mean).unwrap_or(Duration::ZERO)
    }

    /// Fraction of completed attempts that failed (0.0 - 1.0)
    pub fn error_rate(&self) -> f64 {
        if self.completed == 0 {
            return 0.0;
        }
        self.failures as f64 / self.completed as f64
    }

    pub fn failures_of(&self, kind: FailureKind) -> u64 {
        self.failure_breakdown.get(&kind).copied().unwrap_or(0)
    }

    /// Every configured attempt produced an outcome
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.completed == self.requested
    }
}
