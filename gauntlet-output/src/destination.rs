//! Report destinations

use crate::errors::OutputError;
use crate::format::{format_report, render_table, ReportFormat};
use gauntlet_engine::ComparisonReport;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info};

/// Where a rendered report goes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReportDestination {
    #[default]
    Stdout,
    File(PathBuf),
}

impl ReportDestination {
    /// `None` means stdout
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map(ReportDestination::File).unwrap_or_default()
    }

    /// Render `report` and write it out.
    ///
    /// Tables written to an interactive stdout are colored; files never are.
    pub async fn deliver(&self, report: &ComparisonReport, format: ReportFormat) -> Result<(), OutputError> {
        match self {
            ReportDestination::Stdout => {
                let content = match format {
                    ReportFormat::Table if std::io::stdout().is_terminal() => render_table(report, true),
                    _ => format_report(report, format)?,
                };
                let mut writer = BufWriter::new(tokio::io::stdout());
                writer.write_all(content.as_bytes()).await?;
                if !content.ends_with('\n') {
                    writer.write_all(b"\n").await?;
                }
                writer.flush().await?;
                Ok(())
            }
            ReportDestination::File(path) => {
                let content = format_report(report, format)?;
                write_file(path, content.as_bytes()).await?;
                info!("Report written to {}", path.display());
                Ok(())
            }
        }
    }
}

async fn write_file(path: &Path, content: &[u8]) -> Result<(), OutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| OutputError::Filesystem {
                path: parent.display().to_string(),
                operation: "create_dir_all".to_string(),
                error: e.to_string(),
            })?;
    }

    fs::write(path, content)
        .await
        .map_err(|e| OutputError::Filesystem {
            path: path.display().to_string(),
            operation: "write".to_string(),
            error: e.to_string(),
        })?;
    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_core::RunConfig;
    use tempfile::TempDir;

    fn report() -> ComparisonReport {
        let mut report = ComparisonReport::new(RunConfig::new(10, 2));
        report.record_unreachable("JSON", "Actix-web", "http://127.0.0.1:8081/", 3, "timeout");
        report
    }

    #[tokio::test]
    async fn test_file_destination_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports").join("latest.json");
        let destination = ReportDestination::from_path(Some(path.clone()));

        destination.deliver(&report(), ReportFormat::Json).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let back: ComparisonReport = serde_json::from_str(&written).unwrap();
        assert_eq!(back.unreachable_count(), 1);
    }

    #[tokio::test]
    async fn test_file_table_is_plain() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");

        ReportDestination::File(path.clone())
            .deliver(&report(), ReportFormat::Table)
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("unreachable after 3 attempts (timeout)"));
        assert!(!written.contains('\u{1b}'));
    }

    #[tokio::test]
    async fn test_unwritable_path_is_filesystem_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();

        let err = ReportDestination::File(blocker.join("report.md"))
            .deliver(&report(), ReportFormat::Markdown)
            .await
            .unwrap_err();
        assert!(matches!(err, OutputError::Filesystem { .. }));
    }

    #[test]
    fn test_default_is_stdout() {
        assert_eq!(ReportDestination::from_path(None), ReportDestination::Stdout);
    }
}
