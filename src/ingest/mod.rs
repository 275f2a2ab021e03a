//! Mirroring form submissions into the document store
//!
//! A [`SubmissionSource`] yields raw export documents; [`seed`] decodes them
//! and replaces the store contents.

mod errors;
mod seed;
mod source;

pub use errors::{IngestError, IngestResult};
pub use seed::{decode_documents, seed, SeedReport};
pub use source::{
    extract_documents, JsonFileSource, SourceFuture, SubmissionSource, UpstreamSource,
    UPSTREAM_PAGE_SIZE,
};
