//! The `Analyzer` and its case loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use wta_calendar::ResourceCalendar;
use wta_core::AnalysisConfig;
use wta_log::{Case, EventLog, ParallelActivities};

use crate::case::{process_case, CaseOutcome, ViolationRecord};
use crate::{AnalysisObserver, CaseContext, CaseError};

// ── CancelToken ───────────────────────────────────────────────────────────────

/// Shared flag that stops a run early.
///
/// Cases not yet started are skipped; a case that was in flight when the
/// flag was raised is discarded entirely, so every reported outcome is
/// complete.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ── AnalysisOutput ────────────────────────────────────────────────────────────

/// Result of one analysis run.
#[derive(Debug, Default)]
pub struct AnalysisOutput {
    /// Completed cases, in log order.
    pub cases:     Vec<CaseOutcome>,
    /// Cases dropped because of their input, in log order.
    pub failed:    Vec<CaseError>,
    /// Cases dropped because the run was cancelled.
    pub cancelled: usize,
}

impl AnalysisOutput {
    /// Every excluded transition, with its case id.
    pub fn violations(&self) -> impl Iterator<Item = (&str, &ViolationRecord)> {
        self.cases
            .iter()
            .flat_map(|c| c.violations.iter().map(move |v| (c.case_id.as_str(), v)))
    }

    pub fn num_transitions(&self) -> usize {
        self.cases.iter().map(|c| c.transitions.len()).sum()
    }
}

// ── Analyzer ──────────────────────────────────────────────────────────────────

/// Runs the waiting-time analysis over every case of a log.
///
/// Cases are independent: each is processed against read-only shared state
/// and yields a complete [`CaseOutcome`] or a [`CaseError`].  With the
/// `parallel` Cargo feature the cases are spread over a Rayon pool of
/// `config.num_threads` workers; the output is identical either way.
///
/// Create via [`AnalyzerBuilder`][crate::AnalyzerBuilder].
pub struct Analyzer {
    pub log:      EventLog,
    pub parallel: ParallelActivities,
    pub calendar: ResourceCalendar,
    pub config:   AnalysisConfig,
    pub(crate) cancel: CancelToken,
    #[cfg(feature = "parallel")]
    pub(crate) pool: rayon::ThreadPool,
}

impl Analyzer {
    /// A handle that cancels runs of this analyzer from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Analyze every case.
    ///
    /// Calls observer hooks after the (possibly parallel) processing phase.
    /// Use [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: AnalysisObserver>(&self, observer: &mut O) -> AnalysisOutput {
        let cases = self.log.cases();
        info!(cases = cases.len(), instances = self.log.len(), "waiting-time analysis started");
        observer.on_run_start(cases.len());
        let started = Instant::now();

        let results = self.process_all(cases);

        // ── Sequential delivery, in case order ────────────────────────────
        let mut output = AnalysisOutput::default();
        for result in results {
            match result {
                None => output.cancelled += 1,
                Some(Ok(outcome)) => {
                    observer.on_case_done(&outcome);
                    output.cases.push(outcome);
                }
                Some(Err(e)) => {
                    warn!(case = %e.case_id(), error = %e, "skipping case");
                    observer.on_case_failed(&e);
                    output.failed.push(e);
                }
            }
        }

        let skewed: usize = output.cases.iter().map(|c| c.clock_skew).sum();
        if skewed > 0 {
            info!(transitions = skewed, "negative waiting times clamped to zero");
        }
        if output.cancelled > 0 {
            warn!(dropped = output.cancelled, "analysis cancelled");
        }
        info!(
            cases = output.cases.len(),
            failed = output.failed.len(),
            transitions = output.num_transitions(),
            violations = output.violations().count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "waiting-time analysis finished"
        );

        observer.on_run_end(&output);
        output
    }

    /// Process one case, or `None` if the run was cancelled before or during
    /// it.
    fn run_case(&self, case: &Case) -> Option<Result<CaseOutcome, CaseError>> {
        if self.cancel.is_cancelled() {
            return None;
        }
        let started = Instant::now();
        let ctx = CaseContext::new(case, &self.log, &self.parallel, &self.calendar, &self.config);
        let result = process_case(&ctx);
        if self.cancel.is_cancelled() {
            return None;
        }
        debug!(
            case = %case.case_id,
            elapsed_us = started.elapsed().as_micros() as u64,
            "case processed"
        );
        Some(result)
    }

    fn process_all(&self, cases: &[Case]) -> Vec<Option<Result<CaseOutcome, CaseError>>> {
        #[cfg(not(feature = "parallel"))]
        {
            cases.iter().map(|case| self.run_case(case)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            // Indexed collect keeps case order.
            self.pool
                .install(|| cases.par_iter().map(|case| self.run_case(case)).collect())
        }
    }
}
