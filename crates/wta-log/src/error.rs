use thiserror::Error;

use wta_core::CoreError;

#[derive(Debug, Error)]
pub enum LogError {
    /// A required column is absent from the CSV header.  Fatal for the load.
    #[error("required column {0:?} is missing from the log header")]
    MissingColumn(String),

    #[error("log holds {0} activity instances, more than an InstanceId can address")]
    TooLarge(usize),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LogResult<T> = Result<T, LogError>;
