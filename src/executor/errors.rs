//! Query execution errors
//!
//! Error codes:
//! - FORM_QUERY_EXECUTION_FAILED
//! - FORM_QUERY_TIMED_OUT

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::store::StoreError;

/// Executor error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// Store adapter reported a failure
    QueryExecutionFailed,
    /// Store call exceeded the configured deadline
    QueryTimedOut,
}

impl ExecutorErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::QueryExecutionFailed => "FORM_QUERY_EXECUTION_FAILED",
            ExecutorErrorCode::QueryTimedOut => "FORM_QUERY_TIMED_OUT",
        }
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failure while counting or fetching.
///
/// Displays as the underlying message alone; callers surface it verbatim.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct QueryExecutionError {
    code: ExecutorErrorCode,
    message: String,
}

impl QueryExecutionError {
    /// Create an execution failed error
    pub fn execution_failed(reason: impl Into<String>) -> Self {
        Self {
            code: ExecutorErrorCode::QueryExecutionFailed,
            message: reason.into(),
        }
    }

    /// Create a timeout error for the named store operation
    pub fn timed_out(operation: &str, limit: Duration) -> Self {
        Self {
            code: ExecutorErrorCode::QueryTimedOut,
            message: format!("Query {} timed out after {}ms", operation, limit.as_millis()),
        }
    }

    pub fn code(&self) -> ExecutorErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<StoreError> for QueryExecutionError {
    fn from(err: StoreError) -> Self {
        Self::execution_failed(err.to_string())
    }
}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, QueryExecutionError>;
