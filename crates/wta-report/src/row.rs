//! Plain data rows produced by the aggregator and consumed by writers.

use std::collections::BTreeSet;

use chrono::Duration;
use serde::Serialize;

use wta_analysis::WaitingTimeBreakdown;
use wta_core::time::as_secs_f64;

use crate::cte::CteImpact;

/// Grouping key of the transitions report.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TransitionKey {
    pub source_activity:      String,
    pub source_resource:      String,
    pub destination_activity: String,
    pub destination_resource: String,
}

/// All transitions sharing one [`TransitionKey`].
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionReportRow {
    pub key:        TransitionKey,
    /// Number of transition instances.
    pub frequency:  u64,
    /// Element-wise sum of the instances' breakdowns.
    pub breakdown:  WaitingTimeBreakdown,
    pub case_ids:   BTreeSet<String>,
    /// Process CTE if all of this group's waiting time were eliminated.
    pub cte_impact: Option<f64>,
    /// Same, per cause.
    pub cte_impact_by_cause: CteImpact,
}

/// Per-case processing and waiting time.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseSummary {
    pub case_id:         String,
    pub processing_time: Duration,
    pub waiting_time:    Duration,
    pub cte:             Option<f64>,
}

/// Process-level statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessSummary {
    pub num_cases:                usize,
    pub num_activities:           usize,
    pub num_activity_instances:   usize,
    /// Number of report rows (distinct transition keys).
    pub num_transitions:          usize,
    /// Σ frequency.
    pub num_transition_instances: u64,
    /// Transitions excluded by an invariant violation.
    pub num_violations:           usize,
    /// Cases dropped because of their input.
    pub num_failed_cases:         usize,
    pub total_processing_time:    Duration,
    /// Per-cause totals; `totals.total` is the total waiting time.
    pub totals:                   WaitingTimeBreakdown,
    pub process_cte:              Option<f64>,
    pub cte_impact_by_cause:      CteImpact,
}

impl ProcessSummary {
    pub fn total_waiting_time(&self) -> Duration {
        self.totals.total
    }
}

/// A breakdown in seconds, with the report's field names.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct WaitingSeconds {
    pub total_wt:          f64,
    pub batching_wt:       f64,
    pub prioritization_wt: f64,
    pub contention_wt:     f64,
    pub unavailability_wt: f64,
    pub extraneous_wt:     f64,
}

impl From<&WaitingTimeBreakdown> for WaitingSeconds {
    fn from(b: &WaitingTimeBreakdown) -> Self {
        Self {
            total_wt:          as_secs_f64(b.total),
            batching_wt:       as_secs_f64(b.batching),
            prioritization_wt: as_secs_f64(b.prioritization),
            contention_wt:     as_secs_f64(b.contention),
            unavailability_wt: as_secs_f64(b.unavailability),
            extraneous_wt:     as_secs_f64(b.extraneous),
        }
    }
}
