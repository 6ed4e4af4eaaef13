use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletInsightsError {
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Custom granularity requires both a start and an end date")]
    MissingDateRange,

    #[error("Invalid analytics configuration: {0}")]
    InvalidConfig(String),

    #[cfg(feature = "gemini")]
    #[error("Advice request failed: {0}")]
    AdviceFailed(String),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WalletInsightsError>;
