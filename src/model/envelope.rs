//! Projected documents and the result envelope

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::submission::{Question, Submission};

/// Fields returned to callers.
///
/// `submissionId`, `submissionTime` and `questions` are always included.
/// `editLink` only on request. Internal storage ids never are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Projection {
    pub include_edit_link: bool,
}

impl Projection {
    pub fn new(include_edit_link: bool) -> Self {
        Self { include_edit_link }
    }

    /// Names of the projected fields, in output order
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields = vec!["submissionId", "submissionTime", "questions"];
        if self.include_edit_link {
            fields.push("editLink");
        }
        fields
    }

    /// Projects a stored submission
    pub fn apply(&self, submission: &Submission) -> ProjectedSubmission {
        ProjectedSubmission {
            submission_id: submission.submission_id.clone(),
            submission_time: submission.submission_time,
            questions: submission.questions.clone(),
            edit_link: if self.include_edit_link {
                submission.edit_link.clone()
            } else {
                None
            },
        }
    }
}

/// A submission as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedSubmission {
    pub submission_id: String,
    pub submission_time: DateTime<Utc>,
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_link: Option<String>,
}

/// Number of pages of `limit` items needed for `total` items.
///
/// Zero when `limit` is zero.
pub fn page_count(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit))
}

/// Successful query result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    pub responses: Vec<ProjectedSubmission>,
    pub total_responses: u64,
    pub page_count: u64,
}

impl ResultEnvelope {
    /// Assembles an envelope from one fetched page and the matching total
    pub fn new(responses: Vec<ProjectedSubmission>, total_responses: u64, limit: u32) -> Self {
        Self {
            responses,
            total_responses,
            page_count: page_count(total_responses, limit),
        }
    }

    pub fn empty() -> Self {
        Self {
            responses: Vec::new(),
            total_responses: 0,
            page_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_count_arithmetic() {
        assert_eq!(page_count(301, 150), 3);
        assert_eq!(page_count(150, 150), 1);
        assert_eq!(page_count(0, 150), 0);
        assert_eq!(page_count(1, 1), 1);
    }

    #[test]
    fn test_page_count_zero_limit_guarded() {
        assert_eq!(page_count(10, 0), 0);
    }

    #[test]
    fn test_projection_hides_edit_link_unless_requested() {
        let sub = Submission::new("s1", Utc::now()).with_edit_link("https://edit/s1");

        let hidden = Projection::new(false).apply(&sub);
        assert_eq!(hidden.edit_link, None);
        let value = serde_json::to_value(&hidden).unwrap();
        assert!(value.get("editLink").is_none());
        assert!(value.get("status").is_none());

        let shown = Projection::new(true).apply(&sub);
        assert_eq!(shown.edit_link.as_deref(), Some("https://edit/s1"));
    }

    #[test]
    fn test_envelope_serializes_camel_case() {
        let envelope = ResultEnvelope::empty();
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"responses": [], "totalResponses": 0, "pageCount": 0})
        );
    }

    #[test]
    fn test_projection_fields() {
        assert_eq!(Projection::new(false).fields().len(), 3);
        assert_eq!(Projection::new(true).fields().last(), Some(&"editLink"));
    }
}
