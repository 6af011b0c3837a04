//! Comparison report

use chrono::{DateTime, Utc};
use gauntlet_core::{RunConfig, Summary};
use serde::{Deserialize, Serialize};

/// Result of one (scenario, framework) pairing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryResult {
    Measured(Summary),

    /// The readiness probe gave up; no request was measured
    Unreachable {
        url: String,
        attempts: u32,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub scenario: String,
    pub framework: String,
    pub result: EntryResult,
}

impl ReportEntry {
    pub fn summary(&self) -> Option<&Summary> {
        match &self.result {
            EntryResult::Measured(summary) => Some(summary),
            EntryResult::Unreachable { .. } => None,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self.result, EntryResult::Unreachable { .. })
    }
}

/// Every pairing of a comparison, in execution order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub generated_at: DateTime<Utc>,
    pub run: RunConfig,
    pub entries: Vec<ReportEntry>,

    /// The comparison was interrupted; some pairings may be missing or partial
    pub cancelled: bool,
}

impl ComparisonReport {
    pub fn new(run: RunConfig) -> Self {
        Self {
            generated_at: Utc::now(),
            run,
            entries: Vec::new(),
            cancelled: false,
        }
    }

    pub fn record_summary(&mut self, summary: Summary) {
        self.entries.push(ReportEntry {
            scenario: summary.scenario.clone(),
            framework: summary.framework.clone(),
            result: EntryResult::Measured(summary),
        });
    }

    pub fn record_unreachable(
        &mut self,
        scenario: impl Into<String>,
        framework: impl Into<String>,
        url: impl Into<String>,
        attempts: u32,
        reason: impl Into<String>,
    ) {
        self.entries.push(ReportEntry {
            scenario: scenario.into(),
            framework: framework.into(),
            result: EntryResult::Unreachable {
                url: url.into(),
                attempts,
                reason: reason.into(),
            },
        });
    }

    pub fn entry(&self, scenario: &str, framework: &str) -> Option<&ReportEntry> {
        self.entries
            .iter()
            .find(|e| e.scenario == scenario && e.framework == framework)
    }

    pub fn summary(&self, scenario: &str, framework: &str) -> Option<&Summary> {
        self.entry(scenario, framework).and_then(ReportEntry::summary)
    }

    /// Scenario names in first-seen order
    pub fn scenarios(&self) -> Vec<&str> {
        unique_in_order(self.entries.iter().map(|e| e.scenario.as_str()))
    }

    /// Framework names in first-seen order
    pub fn frameworks(&self) -> Vec<&str> {
        unique_in_order(self.entries.iter().map(|e| e.framework.as_str()))
    }

    pub fn entries_for<'a>(&'a self, scenario: &'a str) -> impl Iterator<Item = &'a ReportEntry> + 'a {
        self.entries.iter().filter(move |e| e.scenario == scenario)
    }

    /// Throughput of `framework` relative to `baseline` for one scenario.
    ///
    /// `None` unless both were measured with non-zero baseline throughput.
    pub fn ratio(&self, scenario: &str, framework: &str, baseline: &str) -> Option<f64> {
        let candidate = self.summary(scenario, framework)?;
        let base = self.summary(scenario, baseline)?;
        if base.requests_per_sec <= 0.0 {
            return None;
        }
        Some(candidate.requests_per_sec / base.requests_per_sec)
    }

    /// Highest-throughput non-degenerate summary of a scenario
    pub fn fastest(&self, scenario: &str) -> Option<&Summary> {
        self.entries
            .iter()
            .filter(|e| e.scenario == scenario)
            .filter_map(ReportEntry::summary)
            .filter(|s| !s.degenerate)
            .max_by(|a, b| a.requests_per_sec.total_cmp(&b.requests_per_sec))
    }

    pub fn unreachable_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_unreachable()).count()
    }
}

fn unique_in_order<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for name in names {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}
