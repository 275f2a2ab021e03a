//! Query executor
//!
//! Executes compiled query plans against a document store, producing the
//! result envelope.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use crate::model::{ProjectedSubmission, QuerySpec, ResultEnvelope};
use crate::planner::{FetchOptions, Predicate, QueryPlan};
use crate::store::{DocumentStore, StoreFuture};

use super::errors::{ExecutorResult, QueryExecutionError};

/// Query executor that processes plans against a document store
#[derive(Clone)]
pub struct QueryExecutor {
    store: Arc<dyn DocumentStore>,
    timeout: Option<Duration>,
}

impl QueryExecutor {
    /// Creates a new executor without a deadline
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    /// Bounds every store call by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Number of documents matching the predicate
    pub async fn count(&self, predicate: &Predicate) -> ExecutorResult<u64> {
        self.bounded("count", self.store.count_matching(predicate))
            .await
    }

    /// One sorted, paginated, projected page of matching documents
    pub async fn fetch(
        &self,
        predicate: &Predicate,
        options: &FetchOptions,
    ) -> ExecutorResult<Vec<ProjectedSubmission>> {
        self.bounded("fetch", self.store.query_matching(predicate, options))
            .await
    }

    /// Compiles, counts, fetches and assembles the envelope.
    ///
    /// The count and the page come from two separate store calls; a write
    /// landing between them can make them disagree.
    pub async fn orchestrate(&self, spec: &QuerySpec) -> ExecutorResult<ResultEnvelope> {
        let plan = QueryPlan::from_spec(spec);

        let total = self.count(&plan.predicate).await?;
        let responses = self.fetch(&plan.predicate, &plan.fetch).await?;
        let envelope = ResultEnvelope::new(responses, total, spec.limit);

        debug!(
            store = self.store.name(),
            total_responses = envelope.total_responses,
            page_count = envelope.page_count,
            returned = envelope.responses.len(),
            "query executed"
        );
        Ok(envelope)
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: StoreFuture<'_, T>,
    ) -> ExecutorResult<T> {
        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    error!(
                        store = self.store.name(),
                        operation,
                        timeout_ms = limit.as_millis() as u64,
                        "document store call timed out"
                    );
                    return Err(QueryExecutionError::timed_out(operation, limit));
                }
            },
            None => call.await,
        };

        outcome.map_err(|err| {
            error!(
                store = self.store.name(),
                operation,
                error = %err,
                "document store call failed"
            );
            QueryExecutionError::from(err)
        })
    }
}
