//! Submission documents as they are stored
//!
//! A submission carries a dynamic list of questions. Question ids are opaque
//! and not known ahead of time, so filtering always goes through the list.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

/// Answer value of a single question.
///
/// Numbers keep their JSON representation but compare numerically, so `15`
/// and `15.0` are equal. A number never equals a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionValue {
    Number(Number),
    Text(String),
}

impl QuestionValue {
    /// Builds a numeric value, `None` for NaN or infinities
    pub fn from_f64(value: f64) -> Option<Self> {
        Number::from_f64(value).map(QuestionValue::Number)
    }

    /// Returns the numeric value if this is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            QuestionValue::Number(n) => n.as_f64(),
            QuestionValue::Text(_) => None,
        }
    }

    /// Returns the string value if this is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QuestionValue::Text(s) => Some(s),
            QuestionValue::Number(_) => None,
        }
    }

    /// Type name used in logs and explain output
    pub fn type_name(&self) -> &'static str {
        match self {
            QuestionValue::Number(_) => "number",
            QuestionValue::Text(_) => "string",
        }
    }

    /// Returns true if both values have the same type
    pub fn same_type(&self, other: &QuestionValue) -> bool {
        matches!(
            (self, other),
            (QuestionValue::Number(_), QuestionValue::Number(_))
                | (QuestionValue::Text(_), QuestionValue::Text(_))
        )
    }

    /// Compares two values of the same type.
    ///
    /// Returns `None` when the types differ.
    pub fn compare_same_type(&self, other: &QuestionValue) -> Option<Ordering> {
        match (self, other) {
            (QuestionValue::Number(a), QuestionValue::Number(b)) => {
                a.as_f64()?.partial_cmp(&b.as_f64()?)
            }
            (QuestionValue::Text(a), QuestionValue::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order across types used for MAX/MIN aggregation.
    ///
    /// Numbers sort before strings, matching document store ordering.
    pub fn aggregate_cmp(&self, other: &QuestionValue) -> Ordering {
        match (self, other) {
            (QuestionValue::Number(_), QuestionValue::Text(_)) => Ordering::Less,
            (QuestionValue::Text(_), QuestionValue::Number(_)) => Ordering::Greater,
            _ => self.compare_same_type(other).unwrap_or(Ordering::Equal),
        }
    }
}

impl PartialEq for QuestionValue {
    fn eq(&self, other: &Self) -> bool {
        self.compare_same_type(other) == Some(Ordering::Equal)
    }
}

impl fmt::Display for QuestionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionValue::Number(n) => write!(f, "{}", n),
            QuestionValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<i64> for QuestionValue {
    fn from(value: i64) -> Self {
        QuestionValue::Number(Number::from(value))
    }
}

impl From<i32> for QuestionValue {
    fn from(value: i32) -> Self {
        QuestionValue::Number(Number::from(value))
    }
}

impl From<&str> for QuestionValue {
    fn from(value: &str) -> Self {
        QuestionValue::Text(value.to_string())
    }
}

impl From<String> for QuestionValue {
    fn from(value: String) -> Self {
        QuestionValue::Text(value)
    }
}

/// One answer entry within a submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Opaque question id
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Answer value; `None` is an explicit `null`.
    ///
    /// The key itself is required: a question without `value` does not
    /// conform to the stored schema.
    #[serde(deserialize_with = "nullable")]
    pub value: Option<QuestionValue>,
}

impl Question {
    /// Creates a question with a value
    pub fn new(id: impl Into<String>, value: impl Into<QuestionValue>) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind: None,
            value: Some(value.into()),
        }
    }

    /// Creates a question whose value is explicitly absent
    pub fn absent(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind: None,
            value: None,
        }
    }

    /// Sets the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

fn nullable<'de, D>(deserializer: D) -> Result<Option<QuestionValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<QuestionValue>::deserialize(deserializer)
}

/// Completion state of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    InProgress,
    #[default]
    Finished,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 2] = [SubmissionStatus::InProgress, SubmissionStatus::Finished];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::InProgress => "in_progress",
            SubmissionStatus::Finished => "finished",
        }
    }

    /// Parses the wire representation
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ingested form submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub submission_id: String,
    pub submission_time: DateTime<Utc>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_link: Option<String>,
    #[serde(default)]
    pub status: SubmissionStatus,
}

impl Submission {
    /// Creates a finished submission without questions
    pub fn new(submission_id: impl Into<String>, submission_time: DateTime<Utc>) -> Self {
        Self {
            submission_id: submission_id.into(),
            submission_time,
            questions: Vec::new(),
            edit_link: None,
            status: SubmissionStatus::Finished,
        }
    }

    /// Appends a question
    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    /// Sets the status
    pub fn with_status(mut self, status: SubmissionStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the edit link
    pub fn with_edit_link(mut self, link: impl Into<String>) -> Self {
        self.edit_link = Some(link.into());
        self
    }

    /// Values of every question carrying `id`, absent values included
    pub fn values_for<'a>(&'a self, id: &'a str) -> impl Iterator<Item = Option<&'a QuestionValue>> + 'a {
        self.questions
            .iter()
            .filter(move |q| q.id == id)
            .map(|q| q.value.as_ref())
    }
}
