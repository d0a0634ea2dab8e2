//! The `ReportWriter` trait implemented by all report backends.

use crate::{ReportResult, TransitionsReport};

/// Trait implemented by the CSV and JSON writers.
pub trait ReportWriter {
    /// Write the whole report.
    fn write_report(&mut self, report: &TransitionsReport) -> ReportResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> ReportResult<()>;
}
