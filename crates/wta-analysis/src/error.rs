use thiserror::Error;

use wta_calendar::CalendarError;
use wta_core::CoreError;
use wta_log::LogError;

/// Errors that stop an analysis run before any case is processed.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis configuration error: {0}")]
    Config(String),

    #[error("failed to start worker pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Log(#[from] LogError),

    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

/// Errors that drop a single case.  The run continues with the other cases.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CaseError {
    #[error("case {case_id:?} has unusable input: {reason}")]
    Input { case_id: String, reason: String },
}

impl CaseError {
    pub fn case_id(&self) -> &str {
        match self {
            CaseError::Input { case_id, .. } => case_id,
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
