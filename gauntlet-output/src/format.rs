//! Report rendering

use crate::errors::OutputError;
use colored::Colorize;
use gauntlet_core::Summary;
use gauntlet_engine::{ComparisonReport, EntryResult, ReportEntry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;
use std::time::Duration;

const HEADERS: [&str; 8] = [
    "Framework",
    "Requests/s",
    "Mean",
    "p50",
    "p90",
    "p99",
    "Errors",
    "Relative",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Table,
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Table => "table",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(ReportFormat::Table),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            _ => Err(OutputError::UnknownFormat(s.to_string())),
        }
    }
}

/// Render a report without terminal colors
pub fn format_report(report: &ComparisonReport, format: ReportFormat) -> Result<String, OutputError> {
    match format {
        ReportFormat::Table => Ok(render_table(report, false)),
        ReportFormat::Markdown => Ok(render_markdown(report)),
        ReportFormat::Json => {
            serde_json::to_string_pretty(report).map_err(|e| OutputError::Serialization {
                format: "json".to_string(),
                error: e.to_string(),
            })
        }
    }
}

/// Box-drawn table per scenario; `color` highlights headers and the fastest framework
pub fn render_table(report: &ComparisonReport, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title(report));
    if report.cancelled {
        let notice = "Cancelled: partial results";
        let _ = writeln!(
            out,
            "{}",
            if color {
                notice.bright_yellow().bold().to_string()
            } else {
                notice.to_string()
            }
        );
    }

    for scenario in report.scenarios() {
        let fastest = report.fastest(scenario).map(|s| s.framework.as_str());
        let rows: Vec<Vec<String>> = report
            .entries_for(scenario)
            .map(|entry| row(report, entry))
            .collect();

        let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            if color {
                scenario.bold().to_string()
            } else {
                scenario.to_string()
            }
        );
        out.push_str(&separator(&widths, '┌', '┬', '┐'));

        let header_cells: Vec<String> = HEADERS
            .iter()
            .zip(&widths)
            .map(|(header, width)| {
                let padded = pad(header, *width);
                if color {
                    padded.bright_cyan().bold().to_string()
                } else {
                    padded
                }
            })
            .collect();
        out.push_str(&line(&header_cells));
        out.push_str(&separator(&widths, '├', '┼', '┤'));

        for row in &rows {
            let winner = color && fastest == Some(row[0].as_str());
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| {
                    let padded = pad(cell, *width);
                    if winner {
                        padded.bright_green().to_string()
                    } else {
                        padded
                    }
                })
                .collect();
            out.push_str(&line(&cells));
        }
        out.push_str(&separator(&widths, '└', '┴', '┘'));
    }

    out
}

fn render_markdown(report: &ComparisonReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", title(report));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Generated {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if report.cancelled {
        let _ = writeln!(out);
        let _ = writeln!(out, "> **Cancelled:** partial results");
    }

    for scenario in report.scenarios() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## {}", scenario);
        let _ = writeln!(out);
        let _ = writeln!(out, "| {} |", HEADERS.join(" | "));
        let _ = writeln!(out, "|{}", "---|".repeat(HEADERS.len()));
        for entry in report.entries_for(scenario) {
            let _ = writeln!(out, "| {} |", row(report, entry).join(" | "));
        }
        if let Some(fastest) = report.fastest(scenario) {
            let _ = writeln!(out);
            let _ = writeln!(out, "Fastest: **{}**", fastest.framework);
        }
    }

    out
}

fn title(report: &ComparisonReport) -> String {
    format!(
        "Gauntlet comparison: {} requests, concurrency {}",
        report.run.requests, report.run.concurrency
    )
}

/// Cells of one entry; relative throughput is against the first framework
fn row(report: &ComparisonReport, entry: &ReportEntry) -> Vec<String> {
    match &entry.result {
        EntryResult::Measured(summary) => {
            let baseline = report.frameworks().first().copied().unwrap_or_default();
            let relative = report
                .ratio(&entry.scenario, &entry.framework, baseline)
                .map(|r| format!("{:.2}x", r))
                .unwrap_or_else(|| "-".to_string());
            vec![
                framework_label(summary),
                format!("{:.1}", summary.requests_per_sec),
                latency(summary, |l| l.mean),
                latency(summary, |l| l.p50),
                latency(summary, |l| l.p90),
                latency(summary, |l| l.p99),
                errors(summary),
                relative,
            ]
        }
        EntryResult::Unreachable { attempts, reason, .. } => {
            let mut cells = vec![
                entry.framework.clone(),
                format!("unreachable after {} attempts ({})", attempts, reason),
            ];
            cells.resize(HEADERS.len(), "-".to_string());
            cells
        }
    }
}

fn framework_label(summary: &Summary) -> String {
    if summary.cancelled {
        format!("{} (partial)", summary.framework)
    } else {
        summary.framework.clone()
    }
}

fn latency(summary: &Summary, pick: impl Fn(&gauntlet_core::LatencyStats) -> Duration) -> String {
    summary
        .latency
        .as_ref()
        .map(|stats| format_millis(pick(stats)))
        .unwrap_or_else(|| "-".to_string())
}

fn errors(summary: &Summary) -> String {
    if summary.failures == 0 {
        return "0".to_string();
    }
    let breakdown: Vec<String> = summary
        .failure_breakdown
        .iter()
        .map(|(kind, count)| format!("{} {}", count, kind))
        .collect();
    format!("{} ({})", summary.failures, breakdown.join(", "))
}

fn format_millis(duration: Duration) -> String {
    format!("{:.2} ms", duration.as_secs_f64() * 1000.0)
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{}{}", cell, " ".repeat(width.saturating_sub(len)))
}

fn line(cells: &[String]) -> String {
    format!("│ {} │\n", cells.join(" │ "))
}

fn separator(widths: &[usize], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}\n", left, segments.join(&mid.to_string()), right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_core::{FailureKind, LatencyStats, RunConfig};
    use std::collections::BTreeMap;

    fn summary(scenario: &str, framework: &str, rps: f64) -> Summary {
        Summary {
            scenario: scenario.to_string(),
            framework: framework.to_string(),
            requested: 1_000,
            completed: 1_000,
            successes: 1_000,
            failures: 0,
            wall_clock: Duration::from_millis(500),
            requests_per_sec: rps,
            latency: Some(LatencyStats {
                mean: Duration::from_micros(1_500),
                min: Duration::from_micros(200),
                max: Duration::from_millis(9),
                p50: Duration::from_micros(1_250),
                p90: Duration::from_millis(3),
                p99: Duration::from_millis(7),
            }),
            failure_breakdown: BTreeMap::new(),
            status_codes: BTreeMap::from([(200, 1_000)]),
            degenerate: false,
            cancelled: false,
        }
    }

    fn report() -> ComparisonReport {
        let mut report = ComparisonReport::new(RunConfig::new(1_000, 10));
        report.record_summary(summary("Plain Text", "RustAPI", 4_000.0));
        report.record_summary(summary("Plain Text", "Actix-web", 2_000.0));

        let mut degraded = summary("JSON", "RustAPI", 1_000.0);
        degraded.successes = 990;
        degraded.failures = 10;
        degraded.failure_breakdown.insert(FailureKind::Timeout, 10);
        report.record_summary(degraded);
        report.record_unreachable("JSON", "Actix-web", "http://127.0.0.1:8081/", 20, "connection-refused");
        report
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("Markdown".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("csv".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::default().to_string(), "table");
    }

    #[test]
    fn test_plain_table() {
        let table = format_report(&report(), ReportFormat::Table).unwrap();

        assert!(table.starts_with("Gauntlet comparison: 1000 requests, concurrency 10"));
        assert!(table.contains("Plain Text"));
        assert!(table.contains("4000.0"));
        assert!(table.contains("1.50 ms"));
        assert!(table.contains("0.50x"));
        assert!(table.contains("10 (10 timeout)"));
        assert!(table.contains("unreachable after 20 attempts (connection-refused)"));
        assert!(!table.contains('\u{1b}'), "plain table must not contain escape codes");

        // Every row of a scenario block has the same width
        let widths: Vec<usize> = table
            .lines()
            .skip_while(|l| !l.starts_with('┌'))
            .take_while(|l| !l.starts_with('└'))
            .map(|l| l.chars().count())
            .collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_markdown() {
        let markdown = format_report(&report(), ReportFormat::Markdown).unwrap();

        assert!(markdown.starts_with("# Gauntlet comparison"));
        assert!(markdown.contains("## Plain Text"));
        assert!(markdown.contains("| Framework | Requests/s | Mean |"));
        assert!(markdown.contains("| RustAPI | 4000.0 | 1.50 ms |"));
        assert!(markdown.contains("Fastest: **RustAPI**"));
    }

    #[test]
    fn test_cancelled_report_is_flagged() {
        let mut report = report();
        report.cancelled = true;
        let markdown = format_report(&report, ReportFormat::Markdown).unwrap();
        assert!(markdown.contains("**Cancelled:** partial results"));
    }

    #[test]
    fn test_json() {
        let json = format_report(&report(), ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["entries"].as_array().unwrap().len(), 4);
        assert_eq!(value["run"]["concurrency"], 10);
    }

    #[test]
    fn test_degenerate_row_has_no_latency() {
        let mut report = ComparisonReport::new(RunConfig::new(10, 1));
        let mut failed = summary("JSON", "RustAPI", 50.0);
        failed.successes = 0;
        failed.failures = 10;
        failed.latency = None;
        failed.degenerate = true;
        failed.failure_breakdown.insert(FailureKind::Transport, 10);
        report.record_summary(failed);

        let cells = row(&report, &report.entries[0]);
        assert_eq!(cells[2], "-");
        assert_eq!(cells[6], "10 (10 transport-error)");
    }
}
