//! `wta-report`: process-level transitions report and its writers.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`aggregate`] | `ReportAggregator` (commutative fold), `TransitionsReport`  |
//! | [`cte`]       | `cte`, `impact`, `CteImpact`                                |
//! | [`row`]       | `TransitionKey`, `TransitionReportRow`, `ProcessSummary`, `CaseSummary` |
//! | [`regroup`]   | activity-pair rows with `wt_by_resource`                    |
//! | [`writer`]    | `ReportWriter` trait                                        |
//! | [`csv`]       | `CsvReportWriter` → `<stem>_transitions_report.csv`         |
//! | [`json`]      | `JsonReportWriter` → `<stem>_transitions_report.json`, `<stem>_process_cte_impact.json` |
//! | [`error`]     | `ReportError`, `ReportResult<T>`                            |
//!
//! # Usage
//!
//! ```rust,ignore
//! use wta_report::{CsvReportWriter, JsonReportWriter, ReportAggregator, ReportWriter};
//!
//! let mut aggregator = ReportAggregator::new();
//! analyzer.run(&mut aggregator);
//! let report = aggregator.finish(&analyzer.log);
//!
//! let mut csv = CsvReportWriter::new(Path::new("./output"), "log")?;
//! csv.write_report(&report)?;
//! csv.finish()?;
//! ```

pub mod aggregate;
pub mod csv;
pub mod cte;
pub mod error;
pub mod json;
pub mod regroup;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use crate::csv::CsvReportWriter;
pub use aggregate::{ReportAggregator, TransitionsReport};
pub use cte::{cte, impact, CteImpact};
pub use error::{ReportError, ReportResult};
pub use json::JsonReportWriter;
pub use regroup::{by_activity_pair, ActivityPairRow, ResourcePairRow};
pub use row::{CaseSummary, ProcessSummary, TransitionKey, TransitionReportRow, WaitingSeconds};
pub use writer::ReportWriter;
