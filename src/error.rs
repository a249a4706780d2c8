use std::fmt;
use thiserror::Error;

/// Missing required top-level context fields. Composition never starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FatalContextError {
    #[error("The text catalogue is missing")]
    MissingTexts,
    #[error("The text catalogue is invalid: {0}")]
    InvalidTexts(String),
    #[error("Project data is missing")]
    MissingProjectData,
}

/// Why a single block produced no content.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlockFailure {
    #[error("required data is missing: {0}")]
    MissingData(String),
    #[error("data is invalid: {0}")]
    InvalidData(String),
    #[error("rendering took {elapsed_ms} ms, limit is {limit_ms} ms")]
    TimeLimitExceeded { limit_ms: u64, elapsed_ms: u64 },
    #[error("rendering panicked: {0}")]
    Panicked(String),
}

/// A block failure, recovered by the composer with a visible error marker.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Block '{block}' failed: {cause}")]
pub struct BlockRenderError {
    pub block: String,
    pub cause: BlockFailure,
}

/// Why a recipient's document is not a complete, successful build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    FatalContext,
    BackendUnavailable,
    BackendFailure,
    Timeout,
    Cancelled,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FailureReason::FatalContext => "invalid document context",
            FailureReason::BackendUnavailable => "rendering backend unavailable",
            FailureReason::BackendFailure => "rendering backend failed",
            FailureReason::Timeout => "document timed out",
            FailureReason::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

/// Malformed batch input. Individual recipient failures are never errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("Recipient at position {index} has an empty recipient id")]
    EmptyRecipientId { index: usize },
    #[error("Recipient id '{0}' appears more than once")]
    DuplicateRecipientId(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Theme error: {0}")]
    Theme(#[from] offerdoc_style::ThemeError),
}

/// Extracts a readable message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
