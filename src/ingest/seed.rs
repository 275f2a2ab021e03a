//! Seeding the document store from a source

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::model::Submission;
use crate::store::DocumentStore;

use super::errors::IngestResult;
use super::source::SubmissionSource;

/// Outcome of a seed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SeedReport {
    /// Submissions now stored
    pub inserted: usize,
    /// Documents dropped for not matching the submission schema
    pub skipped: usize,
}

/// Decodes raw documents, dropping the ones that do not conform
pub fn decode_documents(raw: Vec<Value>) -> (Vec<Submission>, usize) {
    let mut submissions = Vec::with_capacity(raw.len());
    let mut skipped = 0;

    for document in raw {
        let submission_id = document
            .get("submissionId")
            .and_then(Value::as_str)
            .unwrap_or("<missing>")
            .to_string();

        match serde_json::from_value::<Submission>(document) {
            Ok(submission) => submissions.push(submission),
            Err(e) => {
                skipped += 1;
                warn!(
                    submission_id = %submission_id,
                    error = %e,
                    "skipping nonconforming submission"
                );
            }
        }
    }

    (submissions, skipped)
}

/// Replaces the store contents with everything the source yields.
///
/// Pre-existing documents are removed even when every fetched document is
/// skipped. Nothing is touched if the fetch itself fails.
pub async fn seed(
    source: &dyn SubmissionSource,
    store: &dyn DocumentStore,
) -> IngestResult<SeedReport> {
    let raw = source.fetch_all().await?;
    let fetched = raw.len();

    let (submissions, skipped) = decode_documents(raw);
    let inserted = store.replace_all(submissions).await?;

    info!(
        source = %source.describe(),
        store = store.name(),
        fetched,
        inserted,
        skipped,
        "seeded submissions"
    );

    Ok(SeedReport { inserted, skipped })
}
