//! Ingestion errors

use thiserror::Error;

use crate::store::StoreError;

/// Result type for ingestion
pub type IngestResult<T> = Result<T, IngestError>;

/// Failures while fetching or storing submissions
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected payload shape: {0}")]
    MalformedPayload(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
