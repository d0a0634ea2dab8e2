//! Read-only inputs passed to every per-case computation.

use wta_calendar::ResourceCalendar;
use wta_core::AnalysisConfig;
use wta_log::{Case, EventLog, ParallelActivities};

/// Everything one case's analysis may look at.
///
/// Built by the [`Analyzer`](crate::Analyzer) for each case and shared
/// immutably with the detectors.  The full log is needed because waiting
/// causes come from *other* cases executed by the same resource.
///
/// # Lifetimes
///
/// All borrows point into the analyzer and live for one case's processing;
/// nothing here is mutated while a run is in progress.
#[derive(Copy, Clone)]
pub struct CaseContext<'a> {
    /// The case being analyzed.
    pub case: &'a Case,

    /// The whole event log.
    pub log: &'a EventLog,

    /// Activities that may run concurrently within a case.
    pub parallel: &'a ParallelActivities,

    /// Weekly working hours per resource (or for the pooled key).
    pub calendar: &'a ResourceCalendar,

    pub config: &'a AnalysisConfig,
}

impl<'a> CaseContext<'a> {
    #[inline]
    pub fn new(
        case:     &'a Case,
        log:      &'a EventLog,
        parallel: &'a ParallelActivities,
        calendar: &'a ResourceCalendar,
        config:   &'a AnalysisConfig,
    ) -> Self {
        Self { case, log, parallel, calendar, config }
    }
}
