//! JSON report backend.
//!
//! Creates two files in the output directory:
//! - `<stem>_transitions_report.json`: process summary, activity-pair
//!   regrouping with `wt_by_resource`, and per-case summaries
//! - `<stem>_process_cte_impact.json`: process-level CTE impact per cause
//!
//! Durations are seconds; undefined ratios are `null`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use wta_core::time::as_secs_f64;

use crate::cte::CteImpact;
use crate::regroup::ActivityPairRow;
use crate::row::WaitingSeconds;
use crate::writer::ReportWriter;
use crate::{ReportResult, TransitionsReport};

#[derive(Serialize)]
struct CaseJson<'a> {
    case_id:         &'a str,
    processing_time: f64,
    waiting_time:    f64,
    cte:             Option<f64>,
}

#[derive(Serialize)]
struct TransitionsJson<'a> {
    num_cases:                usize,
    num_activities:           usize,
    num_activity_instances:   usize,
    num_transitions:          usize,
    num_transition_instances: u64,
    num_violations:           usize,
    num_failed_cases:         usize,
    total_processing_time:    f64,
    #[serde(flatten)]
    totals:                   TotalsJson,
    process_cte:              Option<f64>,
    cte_impact_by_cause:      &'a CteImpact,
    report:                   Vec<ActivityPairRow>,
    cases:                    Vec<CaseJson<'a>>,
}

/// Process totals with `total_` prefixed names.
#[derive(Serialize)]
struct TotalsJson {
    total_wt:                f64,
    total_batching_wt:       f64,
    total_prioritization_wt: f64,
    total_contention_wt:     f64,
    total_unavailability_wt: f64,
    total_extraneous_wt:     f64,
}

impl From<WaitingSeconds> for TotalsJson {
    fn from(s: WaitingSeconds) -> Self {
        Self {
            total_wt:                s.total_wt,
            total_batching_wt:       s.batching_wt,
            total_prioritization_wt: s.prioritization_wt,
            total_contention_wt:     s.contention_wt,
            total_unavailability_wt: s.unavailability_wt,
            total_extraneous_wt:     s.extraneous_wt,
        }
    }
}

/// Writes the transitions report and the CTE impact as JSON documents.
pub struct JsonReportWriter {
    transitions_path: PathBuf,
    cte_impact_path:  PathBuf,
}

impl JsonReportWriter {
    /// Target `<stem>_transitions_report.json` and
    /// `<stem>_process_cte_impact.json` in `dir`.  Files are created on
    /// [`write_report`](ReportWriter::write_report).
    pub fn new(dir: &Path, stem: &str) -> Self {
        Self {
            transitions_path: dir.join(format!("{stem}_transitions_report.json")),
            cte_impact_path:  dir.join(format!("{stem}_process_cte_impact.json")),
        }
    }

    pub fn transitions_path(&self) -> &Path {
        &self.transitions_path
    }

    pub fn cte_impact_path(&self) -> &Path {
        &self.cte_impact_path
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> ReportResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, value)?;
    out.flush()?;
    Ok(())
}

impl ReportWriter for JsonReportWriter {
    fn write_report(&mut self, report: &TransitionsReport) -> ReportResult<()> {
        let s = &report.summary;
        let doc = TransitionsJson {
            num_cases:                s.num_cases,
            num_activities:           s.num_activities,
            num_activity_instances:   s.num_activity_instances,
            num_transitions:          s.num_transitions,
            num_transition_instances: s.num_transition_instances,
            num_violations:           s.num_violations,
            num_failed_cases:         s.num_failed_cases,
            total_processing_time:    as_secs_f64(s.total_processing_time),
            totals:                   WaitingSeconds::from(&s.totals).into(),
            process_cte:              s.process_cte,
            cte_impact_by_cause:      &s.cte_impact_by_cause,
            report:                   report.activity_pairs(),
            cases:                    report
                .cases
                .iter()
                .map(|c| CaseJson {
                    case_id:         &c.case_id,
                    processing_time: as_secs_f64(c.processing_time),
                    waiting_time:    as_secs_f64(c.waiting_time),
                    cte:             c.cte,
                })
                .collect(),
        };

        write_json(&self.transitions_path, &doc)?;
        write_json(&self.cte_impact_path, &s.cte_impact_by_cause)?;
        debug!(
            transitions = %self.transitions_path.display(),
            cte_impact = %self.cte_impact_path.display(),
            "JSON report written"
        );
        Ok(())
    }

    /// Each document is flushed when written; nothing is held open.
    fn finish(&mut self) -> ReportResult<()> {
        Ok(())
    }
}
