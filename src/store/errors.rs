//! Document store errors

use thiserror::Error;

/// Result type for document store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a store adapter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Store cannot be reached or its state is unusable
    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    /// Store refused the translated query
    #[error("Document store rejected query: {0}")]
    Rejected(String),
}

impl StoreError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}
