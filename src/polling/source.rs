use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::readings::PayloadError;

/// Why a poll produced no data. Any of these aborts the cycle before
/// classification.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("endpoint returned HTTP {0}")]
    Status(u16),
    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),
    #[error("payload could not be parsed: {0}")]
    Decode(String),
    #[error("payload rejected: {0}")]
    Payload(#[from] PayloadError),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// Producer of the telemetry document, fetched once per cycle.
#[async_trait]
pub trait HookSource: Send + Sync {
    async fn fetch(&self) -> Result<Value, FetchError>;

    /// Short label for logs.
    fn describe(&self) -> String;
}
