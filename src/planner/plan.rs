//! Query plan: the compiled predicate plus fetch options

use crate::model::{Projection, QuerySpec};

use super::ast::{DocumentField, Predicate, SortSpec};
use super::compiler::compile;

/// Sort, pagination and projection for a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub sort: SortSpec,
    pub skip: u64,
    pub limit: u32,
    pub projection: Projection,
}

impl FetchOptions {
    /// Derives fetch options from a spec. Always sorts on submission time.
    pub fn from_spec(spec: &QuerySpec) -> Self {
        Self {
            sort: SortSpec {
                field: DocumentField::SubmissionTime,
                direction: spec.sort,
            },
            skip: spec.offset,
            limit: spec.limit,
            projection: Projection::new(spec.include_edit_link),
        }
    }
}

/// Immutable query plan (no runtime state)
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub predicate: Predicate,
    pub fetch: FetchOptions,
}

impl QueryPlan {
    /// Compiles the predicate and derives fetch options
    pub fn from_spec(spec: &QuerySpec) -> Self {
        Self {
            predicate: compile(spec),
            fetch: FetchOptions::from_spec(spec),
        }
    }
}
