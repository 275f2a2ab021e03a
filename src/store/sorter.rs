//! Result ordering for the in-memory store
//!
//! Sort is stable: documents with equal keys keep insertion order in both
//! directions.

use std::cmp::Ordering;

use crate::model::Submission;
use crate::planner::{DocumentField, SortSpec};

/// Sorts matched submissions
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts borrowed submissions by field and direction
    pub fn sort(documents: &mut [&Submission], sort_spec: &SortSpec) {
        documents.sort_by(|a, b| {
            let ordering = Self::compare_field(a, b, sort_spec.field);
            if sort_spec.direction.is_ascending() {
                ordering
            } else {
                ordering.reverse()
            }
        });
    }

    fn compare_field(a: &Submission, b: &Submission, field: DocumentField) -> Ordering {
        match field {
            DocumentField::SubmissionTime => a.submission_time.cmp(&b.submission_time),
            DocumentField::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_doc(id: &str, hour: u32) -> Submission {
        Submission::new(id, Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap())
    }

    fn ids(docs: &[&Submission]) -> Vec<String> {
        docs.iter().map(|d| d.submission_id.clone()).collect()
    }

    #[test]
    fn test_sort_ascending() {
        let (c, a, b) = (make_doc("c", 3), make_doc("a", 1), make_doc("b", 2));
        let mut docs = vec![&c, &a, &b];

        ResultSorter::sort(&mut docs, &SortSpec::asc(DocumentField::SubmissionTime));

        assert_eq!(ids(&docs), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_descending() {
        let (c, a, b) = (make_doc("c", 3), make_doc("a", 1), make_doc("b", 2));
        let mut docs = vec![&c, &a, &b];

        ResultSorter::sort(&mut docs, &SortSpec::desc(DocumentField::SubmissionTime));

        assert_eq!(ids(&docs), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_sort_stable() {
        let (a, b, c) = (make_doc("a", 5), make_doc("b", 5), make_doc("c", 5));
        let mut docs = vec![&a, &b, &c];

        ResultSorter::sort(&mut docs, &SortSpec::desc(DocumentField::SubmissionTime));

        assert_eq!(ids(&docs), vec!["a", "b", "c"]);
    }
}
