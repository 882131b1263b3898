//! Harness error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record {index}: {message}")]
    RecordFormat { index: usize, message: String },
    #[error("invalid value '{value}' for {key}")]
    Config { key: String, value: String },
}

impl HarnessError {
    pub(crate) fn record(index: usize, message: impl Into<String>) -> Self {
        Self::RecordFormat {
            index,
            message: message.into(),
        }
    }
}
