//! Query executor
//!
//! Runs a validated [`QuerySpec`](crate::model::QuerySpec) against a
//! [`DocumentStore`](crate::store::DocumentStore).
//!
//! # Execution Flow
//!
//! 1. Compile the QuerySpec into a query plan
//! 2. Count every matching document (pagination ignored)
//! 3. Fetch one sorted, projected page
//! 4. Assemble the result envelope
//!
//! Any store failure aborts the request; no partial envelope is returned.

mod errors;
mod executor;

pub use errors::{ExecutorErrorCode, ExecutorResult, QueryExecutionError};
pub use executor::QueryExecutor;
