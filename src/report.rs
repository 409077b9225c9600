//! # Report Module
//!
//! Logs check outcomes and writes them as JSON Lines.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::checks::{CheckOutcome, CheckReport, Violation};
use crate::error::Result;
use crate::harness::LogFile;

/// Outcome counts of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errored: usize,
}

impl Summary {
    pub fn from_reports(reports: &[CheckReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            match report.outcome {
                CheckOutcome::Passed => summary.passed += 1,
                CheckOutcome::Failed { .. } => summary.failed += 1,
                CheckOutcome::Skipped { .. } => summary.skipped += 1,
                CheckOutcome::Errored { .. } => summary.errored += 1,
            }
        }
        summary
    }

    /// Skips do not fail a run
    pub fn success(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}

/// One JSON line per check
#[derive(Debug, Serialize)]
struct ReportRecord<'a> {
    generated_at: &'a str,
    log_file: String,
    check: &'a str,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
    violation_count: usize,
    violations: &'a [Violation],
}

/// Log every outcome, with up to `max_rows` violating rows per failed check
pub fn log_reports(reports: &[CheckReport], max_rows: usize) -> Summary {
    for report in reports {
        if let CheckOutcome::Failed { violations } = &report.outcome {
            for v in violations.iter().take(max_rows) {
                warn!(
                    "{}: row {} at {} us breaks '{}' {:?}",
                    report.name, v.row, v.timestamp_us, v.rule, v.values
                );
            }
            if violations.len() > max_rows {
                warn!("{}: {} more violating rows", report.name, violations.len() - max_rows);
            }
        }
    }

    let summary = Summary::from_reports(reports);
    info!(
        "{} passed, {} failed, {} skipped, {} errored",
        summary.passed, summary.failed, summary.skipped, summary.errored
    );
    summary
}

/// Write reports as JSON Lines
///
/// # Errors
///
/// Returns error if serialization or writing fails
pub fn write_jsonl<W: Write>(
    mut writer: W,
    log_file: &LogFile,
    reports: &[CheckReport],
    max_rows: usize,
) -> Result<()> {
    let generated_at = Utc::now().to_rfc3339();
    let none: &[Violation] = &[];

    for report in reports {
        let (reason, violations) = match &report.outcome {
            CheckOutcome::Passed => (None, none),
            CheckOutcome::Failed { violations } => (None, violations.as_slice()),
            CheckOutcome::Skipped { reason } | CheckOutcome::Errored { reason } => {
                (Some(reason.as_str()), none)
            }
        };

        let record = ReportRecord {
            generated_at: &generated_at,
            log_file: log_file.to_string(),
            check: report.name,
            outcome: report.outcome.label(),
            reason,
            violation_count: violations.len(),
            violations: &violations[..violations.len().min(max_rows)],
        };

        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}

/// Write reports to a JSON Lines file, replacing it
///
/// # Errors
///
/// Returns error if the file cannot be created or written
pub fn write_report_file<P: AsRef<Path>>(
    path: P,
    log_file: &LogFile,
    reports: &[CheckReport],
    max_rows: usize,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_jsonl(BufWriter::new(file), log_file, reports, max_rows)?;
    info!("Report written to {}", path.as_ref().display());
    Ok(())
}
