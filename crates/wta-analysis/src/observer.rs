//! Analysis observer trait for progress reporting and result collection.

use crate::{AnalysisOutput, CaseError, CaseOutcome};

/// Callbacks invoked by [`Analyzer::run`][crate::Analyzer::run].
///
/// Cases may be processed in parallel, but callbacks are always delivered
/// sequentially on the calling thread, in case order.  All methods have
/// default no-op implementations.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress { done: usize }
///
/// impl AnalysisObserver for Progress {
///     fn on_case_done(&mut self, outcome: &CaseOutcome) {
///         self.done += 1;
///         println!("{}: {} transitions", outcome.case_id, outcome.transitions.len());
///     }
/// }
/// ```
pub trait AnalysisObserver {
    /// Called once before any case is processed.
    fn on_run_start(&mut self, _num_cases: usize) {}

    /// Called for every case that completed.
    fn on_case_done(&mut self, _outcome: &CaseOutcome) {}

    /// Called for every case dropped because of its input.
    fn on_case_failed(&mut self, _error: &CaseError) {}

    /// Called once after all callbacks for individual cases.
    fn on_run_end(&mut self, _output: &AnalysisOutput) {}
}

/// An [`AnalysisObserver`] that does nothing.
pub struct NoopObserver;

impl AnalysisObserver for NoopObserver {}
