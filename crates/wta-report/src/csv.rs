//! CSV report backend.
//!
//! Creates `<stem>_transitions_report.csv` in the output directory: one row
//! per transition key, durations in seconds, case ids comma-joined.  An
//! undefined `cte_impact` is written as an empty cell.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::Writer;
use tracing::debug;

use wta_core::time::as_secs_f64;

use crate::writer::ReportWriter;
use crate::{ReportResult, TransitionsReport};

/// Header of the transitions CSV.
pub const TRANSITIONS_HEADER: [&str; 13] = [
    "source_activity",
    "source_resource",
    "destination_activity",
    "destination_resource",
    "frequency",
    "wt_total",
    "wt_batching",
    "wt_contention",
    "wt_prioritization",
    "wt_unavailability",
    "wt_extraneous",
    "cte_impact",
    "case_ids",
];

/// Writes the transitions report to a CSV file.
pub struct CsvReportWriter {
    path:     PathBuf,
    rows:     Writer<File>,
    finished: bool,
}

impl CsvReportWriter {
    /// Create `<stem>_transitions_report.csv` in `dir` and write the header.
    pub fn new(dir: &Path, stem: &str) -> ReportResult<Self> {
        let path = dir.join(format!("{stem}_transitions_report.csv"));
        let mut rows = Writer::from_path(&path)?;
        rows.write_record(TRANSITIONS_HEADER)?;
        Ok(Self { path, rows, finished: false })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportWriter for CsvReportWriter {
    fn write_report(&mut self, report: &TransitionsReport) -> ReportResult<()> {
        for row in &report.rows {
            let b = &row.breakdown;
            let case_ids: Vec<&str> = row.case_ids.iter().map(String::as_str).collect();
            self.rows.write_record(&[
                row.key.source_activity.clone(),
                row.key.source_resource.clone(),
                row.key.destination_activity.clone(),
                row.key.destination_resource.clone(),
                row.frequency.to_string(),
                as_secs_f64(b.total).to_string(),
                as_secs_f64(b.batching).to_string(),
                as_secs_f64(b.contention).to_string(),
                as_secs_f64(b.prioritization).to_string(),
                as_secs_f64(b.unavailability).to_string(),
                as_secs_f64(b.extraneous).to_string(),
                row.cte_impact.map(|v| v.to_string()).unwrap_or_default(),
                case_ids.join(","),
            ])?;
        }
        debug!(path = %self.path.display(), rows = report.rows.len(), "transitions CSV written");
        Ok(())
    }

    fn finish(&mut self) -> ReportResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.rows.flush()?;
        Ok(())
    }
}
