//! Document store abstraction
//!
//! The executor talks to storage through [`DocumentStore`]. Adapters take a
//! compiled [`Predicate`] and translate it into their own query language:
//! [`InMemoryStore`] evaluates the tree directly, [`mongo`] renders it as
//! aggregation stages.

mod errors;
pub mod evaluate;
mod memory;
pub mod mongo;
mod sorter;

use std::future::Future;
use std::pin::Pin;

use crate::model::{ProjectedSubmission, Submission};
use crate::planner::{FetchOptions, Predicate};

pub use errors::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use sorter::ResultSorter;

/// Boxed future returned by store operations
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// Storage seam used by the query executor and the ingest job
pub trait DocumentStore: Send + Sync {
    /// Counts documents matching the predicate, ignoring pagination
    fn count_matching<'a>(&'a self, predicate: &'a Predicate) -> StoreFuture<'a, u64>;

    /// Returns one page of matching documents, sorted and projected
    fn query_matching<'a>(
        &'a self,
        predicate: &'a Predicate,
        options: &'a FetchOptions,
    ) -> StoreFuture<'a, Vec<ProjectedSubmission>>;

    /// Replaces the whole collection. Returns the number of stored documents.
    fn replace_all(&self, submissions: Vec<Submission>) -> StoreFuture<'_, usize>;

    /// Short adapter name for logs
    fn name(&self) -> &'static str;
}
