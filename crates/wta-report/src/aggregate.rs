//! Folding case outcomes into the process-level transitions report.

use std::collections::BTreeSet;

use chrono::Duration;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::info;

use wta_analysis::{AnalysisObserver, CaseError, CaseOutcome, WaitingTimeBreakdown};
use wta_core::CaseIndex;
use wta_log::EventLog;

use crate::cte::{cte, impact, CteImpact};
use crate::regroup::{by_activity_pair, ActivityPairRow};
use crate::row::{CaseSummary, ProcessSummary, TransitionKey, TransitionReportRow};

// ── ReportAggregator ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
struct GroupAcc {
    frequency: u64,
    breakdown: WaitingTimeBreakdown,
    case_ids:  BTreeSet<String>,
}

impl GroupAcc {
    fn merge(&mut self, other: GroupAcc) {
        self.frequency += other.frequency;
        self.breakdown += other.breakdown;
        self.case_ids.extend(other.case_ids);
    }
}

/// Accumulates case outcomes.
///
/// The fold is commutative and associative: any partition of the cases,
/// aggregated separately and [merged](Self::merge), finishes into the same
/// report.  Also usable directly as an [`AnalysisObserver`].
#[derive(Clone, Debug, Default)]
pub struct ReportAggregator {
    groups:     FxHashMap<TransitionKey, GroupAcc>,
    cases:      Vec<(CaseIndex, CaseSummary)>,
    violations: usize,
    failed:     usize,
}

impl ReportAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one completed case.
    pub fn add_case(&mut self, outcome: &CaseOutcome) {
        for t in &outcome.transitions {
            let key = TransitionKey {
                source_activity:      t.source_activity.clone(),
                source_resource:      t.source_resource.clone(),
                destination_activity: t.destination_activity.clone(),
                destination_resource: t.destination_resource.clone(),
            };
            let acc = self.groups.entry(key).or_default();
            acc.frequency += 1;
            acc.breakdown += t.breakdown;
            if !acc.case_ids.contains(&outcome.case_id) {
                acc.case_ids.insert(outcome.case_id.clone());
            }
        }

        let waiting_time = outcome.waiting_time();
        self.cases.push((outcome.case_index, CaseSummary {
            case_id: outcome.case_id.clone(),
            processing_time: outcome.processing_time,
            waiting_time,
            cte: cte(outcome.processing_time, waiting_time),
        }));
        self.violations += outcome.violations.len();
    }

    /// Count a case dropped because of its input.
    pub fn add_failed(&mut self) {
        self.failed += 1;
    }

    /// Absorb another aggregator.
    pub fn merge(&mut self, other: ReportAggregator) {
        for (key, acc) in other.groups {
            self.groups.entry(key).or_default().merge(acc);
        }
        self.cases.extend(other.cases);
        self.violations += other.violations;
        self.failed += other.failed;
    }

    /// Number of distinct transition keys seen so far.
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Build the final report.
    ///
    /// Log-level counts and the total processing time are taken from `log`,
    /// so instances of cases that yielded no transitions still count.
    pub fn finish(self, log: &EventLog) -> TransitionsReport {
        let total_processing_time = log.total_processing_time();

        let totals = self
            .groups
            .values()
            .fold(WaitingTimeBreakdown::default(), |acc, g| acc + g.breakdown);
        let total_waiting_time = totals.total;

        let mut rows: Vec<TransitionReportRow> = self
            .groups
            .into_iter()
            .map(|(key, acc)| TransitionReportRow {
                key,
                frequency: acc.frequency,
                cte_impact: impact(total_processing_time, total_waiting_time, acc.breakdown.total),
                cte_impact_by_cause: CteImpact::new(total_processing_time, total_waiting_time, &acc.breakdown),
                breakdown: acc.breakdown,
                case_ids: acc.case_ids,
            })
            .collect();
        rows.sort_by(|a, b| a.key.cmp(&b.key));

        let mut cases = self.cases;
        cases.sort_by_key(|(index, _)| *index);
        let cases: Vec<CaseSummary> = cases.into_iter().map(|(_, summary)| summary).collect();

        let activities: FxHashSet<&str> = log.instances().iter().map(|i| i.activity.as_str()).collect();

        let summary = ProcessSummary {
            num_cases: log.num_cases(),
            num_activities: activities.len(),
            num_activity_instances: log.len(),
            num_transitions: rows.len(),
            num_transition_instances: rows.iter().map(|r| r.frequency).sum(),
            num_violations: self.violations,
            num_failed_cases: self.failed,
            total_processing_time,
            totals,
            process_cte: cte(total_processing_time, total_waiting_time),
            cte_impact_by_cause: CteImpact::new(total_processing_time, total_waiting_time, &totals),
        };

        info!(
            transitions = summary.num_transitions,
            transition_instances = summary.num_transition_instances,
            process_cte = ?summary.process_cte,
            "transitions report built"
        );

        TransitionsReport { summary, rows, cases }
    }
}

impl AnalysisObserver for ReportAggregator {
    fn on_case_done(&mut self, outcome: &CaseOutcome) {
        self.add_case(outcome);
    }

    fn on_case_failed(&mut self, _error: &CaseError) {
        self.add_failed();
    }
}

// ── TransitionsReport ─────────────────────────────────────────────────────────

/// The finished report.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionsReport {
    pub summary: ProcessSummary,
    /// Sorted by key.
    pub rows:    Vec<TransitionReportRow>,
    /// In log order.
    pub cases:   Vec<CaseSummary>,
}

impl TransitionsReport {
    /// Rows regrouped by `(source_activity, destination_activity)`.
    pub fn activity_pairs(&self) -> Vec<ActivityPairRow> {
        by_activity_pair(&self.rows)
    }

    pub fn total_waiting_time(&self) -> Duration {
        self.summary.total_waiting_time()
    }
}
