use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("calendar parse error: {0}")]
    Parse(String),

    #[error("invalid calendar slot: {0}")]
    Slot(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CalendarResult<T> = Result<T, CalendarError>;
