//! In-memory document store
//!
//! Holds the mirrored submissions in insertion order and evaluates
//! predicate trees directly.

use std::future;
use std::sync::RwLock;

use tracing::debug;

use crate::model::{ProjectedSubmission, Submission};
use crate::planner::{FetchOptions, Predicate};

use super::errors::{StoreError, StoreResult};
use super::evaluate::matches;
use super::sorter::ResultSorter;
use super::{DocumentStore, StoreFuture};

/// Document store backed by a vector
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: RwLock<Vec<Submission>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with submissions
    pub fn with_documents(documents: Vec<Submission>) -> Self {
        Self {
            documents: RwLock::new(documents),
        }
    }

    /// Number of stored submissions
    pub fn len(&self) -> usize {
        self.documents.read().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a single submission
    pub fn insert(&self, submission: Submission) -> StoreResult<()> {
        self.documents
            .write()
            .map_err(|_| StoreError::unavailable("lock poisoned"))?
            .push(submission);
        Ok(())
    }

    fn count(&self, predicate: &Predicate) -> StoreResult<u64> {
        let docs = self
            .documents
            .read()
            .map_err(|_| StoreError::unavailable("lock poisoned"))?;

        Ok(docs.iter().filter(|doc| matches(doc, predicate)).count() as u64)
    }

    fn select(
        &self,
        predicate: &Predicate,
        options: &FetchOptions,
    ) -> StoreResult<Vec<ProjectedSubmission>> {
        let docs = self
            .documents
            .read()
            .map_err(|_| StoreError::unavailable("lock poisoned"))?;

        let mut matched: Vec<&Submission> =
            docs.iter().filter(|doc| matches(doc, predicate)).collect();
        ResultSorter::sort(&mut matched, &options.sort);

        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        let page: Vec<ProjectedSubmission> = matched
            .into_iter()
            .skip(skip)
            .take(options.limit as usize)
            .map(|doc| options.projection.apply(doc))
            .collect();

        debug!(
            skip = options.skip,
            limit = options.limit,
            returned = page.len(),
            "in-memory fetch"
        );
        Ok(page)
    }

    fn replace(&self, submissions: Vec<Submission>) -> StoreResult<usize> {
        let mut docs = self
            .documents
            .write()
            .map_err(|_| StoreError::unavailable("lock poisoned"))?;

        let count = submissions.len();
        *docs = submissions;
        Ok(count)
    }
}

impl DocumentStore for InMemoryStore {
    fn count_matching<'a>(&'a self, predicate: &'a Predicate) -> StoreFuture<'a, u64> {
        Box::pin(future::ready(self.count(predicate)))
    }

    fn query_matching<'a>(
        &'a self,
        predicate: &'a Predicate,
        options: &'a FetchOptions,
    ) -> StoreFuture<'a, Vec<ProjectedSubmission>> {
        Box::pin(future::ready(self.select(predicate, options)))
    }

    fn replace_all(&self, submissions: Vec<Submission>) -> StoreFuture<'_, usize> {
        Box::pin(future::ready(self.replace(submissions)))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
