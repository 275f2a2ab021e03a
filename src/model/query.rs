//! Normalized query parameters
//!
//! A [`QuerySpec`] is built fresh per request by the validator. The core
//! trusts its bounds and never re-validates them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::submission::{QuestionValue, SubmissionStatus};

/// Smallest page size accepted
pub const MIN_LIMIT: u32 = 1;

/// Largest page size accepted
pub const MAX_LIMIT: u32 = 150;

/// Page size when none is requested
pub const DEFAULT_LIMIT: u32 = 150;

/// Offset when none is requested
pub const DEFAULT_OFFSET: u64 = 0;

/// Comparison applied by a filter clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Equals,
    DoesNotEqual,
    GreaterThan,
    LessThan,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::Equals,
        Condition::DoesNotEqual,
        Condition::GreaterThan,
        Condition::LessThan,
    ];

    /// Wire name of the condition
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Equals => "equals",
            Condition::DoesNotEqual => "does_not_equal",
            Condition::GreaterThan => "greater_than",
            Condition::LessThan => "less_than",
        }
    }

    /// Parses a wire name
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition as it appears on a clause.
///
/// The validator only ever produces `Known`. `Unrecognized` exists for
/// pre-normalized specs loaded without validation; the compiler turns it into
/// a predicate that matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClauseCondition {
    Known(Condition),
    Unrecognized(String),
}

impl From<String> for ClauseCondition {
    fn from(value: String) -> Self {
        match Condition::parse(&value) {
            Some(condition) => ClauseCondition::Known(condition),
            None => ClauseCondition::Unrecognized(value),
        }
    }
}

impl From<ClauseCondition> for String {
    fn from(value: ClauseCondition) -> Self {
        match value {
            ClauseCondition::Known(condition) => condition.as_str().to_string(),
            ClauseCondition::Unrecognized(raw) => raw,
        }
    }
}

impl From<Condition> for ClauseCondition {
    fn from(value: Condition) -> Self {
        ClauseCondition::Known(value)
    }
}

/// One comparison targeting a question id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    pub id: String,
    pub condition: ClauseCondition,
    pub value: QuestionValue,
}

impl FilterClause {
    pub fn new(id: impl Into<String>, condition: Condition, value: impl Into<QuestionValue>) -> Self {
        Self {
            id: id.into(),
            condition: ClauseCondition::Known(condition),
            value: value.into(),
        }
    }

    pub fn equals(id: impl Into<String>, value: impl Into<QuestionValue>) -> Self {
        Self::new(id, Condition::Equals, value)
    }

    pub fn does_not_equal(id: impl Into<String>, value: impl Into<QuestionValue>) -> Self {
        Self::new(id, Condition::DoesNotEqual, value)
    }

    pub fn greater_than(id: impl Into<String>, value: impl Into<QuestionValue>) -> Self {
        Self::new(id, Condition::GreaterThan, value)
    }

    pub fn less_than(id: impl Into<String>, value: impl Into<QuestionValue>) -> Self {
        Self::new(id, Condition::LessThan, value)
    }
}

/// Requested ordering on submission time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, SortOrder::Asc)
    }
}

/// Normalized, bounded request parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySpec {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: SubmissionStatus,
    #[serde(default)]
    pub include_edit_link: bool,
    #[serde(default)]
    pub sort: SortOrder,
    /// Non-empty when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterClause>>,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
            after_date: None,
            before_date: None,
            status: SubmissionStatus::default(),
            include_edit_link: false,
            sort: SortOrder::default(),
            filters: None,
        }
    }
}

impl QuerySpec {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn after(mut self, date: DateTime<Utc>) -> Self {
        self.after_date = Some(date);
        self
    }

    pub fn before(mut self, date: DateTime<Utc>) -> Self {
        self.before_date = Some(date);
        self
    }

    pub fn with_status(mut self, status: SubmissionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_edit_link(mut self) -> Self {
        self.include_edit_link = true;
        self
    }

    /// Appends a filter clause
    pub fn with_filter(mut self, clause: FilterClause) -> Self {
        self.filters.get_or_insert_with(Vec::new).push(clause);
        self
    }

    /// Returns true if a non-empty filters list is present
    pub fn has_filters(&self) -> bool {
        self.filters.as_ref().is_some_and(|f| !f.is_empty())
    }
}
