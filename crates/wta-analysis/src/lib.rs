//! `wta-analysis`: explains why activity instances waited.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`context`]   | `CaseContext` (read-only per-case inputs)                    |
//! | [`detect`]    | batching / contention / prioritization / unavailability detectors |
//! | [`decompose`] | `WaitingTimeBreakdown`, `Cause`, `decompose`, `InvariantViolation` |
//! | [`case`]      | `process_case`, `CaseOutcome`, `TransitionRecord`            |
//! | [`runner`]    | `Analyzer`, `AnalysisOutput`, `CancelToken`                  |
//! | [`builder`]   | `AnalyzerBuilder`                                            |
//! | [`observer`]  | `AnalysisObserver` trait, `NoopObserver`                     |
//! | [`error`]     | `AnalysisError`, `CaseError`, `AnalysisResult<T>`            |
//!
//! # Pipeline (summary)
//!
//! ```text
//! for each case (parallel with the `parallel` feature):
//!     for each transition (source → destination):
//!         total  = max(0, destination.start − destination.enabled)
//!         causes = detect_causes(destination, ctx)      // skipped when total == 0
//!         split  = decompose(total, causes)              // validated 5-way breakdown
//! ```
//!
//! Outcomes are delivered to the observer sequentially, in case order.

pub mod builder;
pub mod case;
pub mod context;
pub mod decompose;
pub mod detect;
pub mod error;
pub mod observer;
pub mod runner;

#[cfg(test)]
mod tests;

pub use builder::AnalyzerBuilder;
pub use case::{process_case, CaseOutcome, TransitionRecord, ViolationRecord};
pub use context::CaseContext;
pub use decompose::{decompose, Cause, InvariantViolation, WaitingTimeBreakdown};
pub use detect::{detect_causes, WaitingCauses};
pub use error::{AnalysisError, AnalysisResult, CaseError};
pub use observer::{AnalysisObserver, NoopObserver};
pub use runner::{AnalysisOutput, Analyzer, CancelToken};
