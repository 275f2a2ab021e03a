//! Data model for mirrored form submissions
//!
//! Documents held by the store ([`Submission`]), the normalized request
//! ([`QuerySpec`]) and the envelope handed back to callers
//! ([`ResultEnvelope`]).

mod envelope;
mod query;
mod submission;

pub use envelope::{page_count, ProjectedSubmission, Projection, ResultEnvelope};
pub use query::{
    ClauseCondition, Condition, FilterClause, QuerySpec, SortOrder, DEFAULT_LIMIT, DEFAULT_OFFSET,
    MAX_LIMIT, MIN_LIMIT,
};
pub use submission::{Question, QuestionValue, Submission, SubmissionStatus};
