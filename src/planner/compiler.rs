//! Filter predicate compiler
//!
//! Turns a validated [`QuerySpec`] into a [`Predicate`]. Pure and
//! deterministic: the same spec always compiles to an equal tree, and
//! compilation never fails.

use tracing::{debug, warn};

use crate::model::{ClauseCondition, Condition, FilterClause, QuerySpec, QuestionValue};

use super::ast::{CompareOp, DocumentField, ElementTest, Literal, Operand, Predicate, Subject};

/// Compiles a query spec into a predicate.
///
/// `AND(dateTerm?, statusTerm, filtersTerm?)`, absent optional terms omitted.
pub fn compile(spec: &QuerySpec) -> Predicate {
    let mut terms = Vec::with_capacity(3);

    if let Some(date) = date_term(spec) {
        terms.push(date);
    }

    terms.push(Predicate::compare(
        Operand::Field(DocumentField::Status),
        CompareOp::Eq,
        Literal::Status(spec.status),
    ));

    if let Some(filters) = spec.filters.as_deref().filter(|f| !f.is_empty()) {
        terms.push(filters_term(filters));
    }

    let predicate = Predicate::and(terms);
    debug!(nodes = predicate.node_count(), %predicate, "compiled query predicate");
    predicate
}

/// Open interval on submission time. Both bounds strict.
fn date_term(spec: &QuerySpec) -> Option<Predicate> {
    let after = spec.after_date.map(|after| {
        Predicate::compare(
            Operand::Field(DocumentField::SubmissionTime),
            CompareOp::Gt,
            Literal::Timestamp(after),
        )
    });
    let before = spec.before_date.map(|before| {
        Predicate::compare(
            Operand::Field(DocumentField::SubmissionTime),
            CompareOp::Lt,
            Literal::Timestamp(before),
        )
    });

    match (after, before) {
        (Some(after), Some(before)) => Some(Predicate::and(vec![after, before])),
        (after, before) => after.or(before),
    }
}

/// Every clause, conjoined with the document-wide null guard
fn filters_term(clauses: &[FilterClause]) -> Predicate {
    let mut parts: Vec<Predicate> = clauses.iter().map(compile_clause).collect();
    parts.push(null_guard());
    Predicate::and(parts)
}

/// Excludes a document if any of its questions has an absent value
pub fn null_guard() -> Predicate {
    Predicate::not(Predicate::exists(
        Subject::Questions,
        vec![ElementTest::ValueAbsent],
    ))
}

/// Compiles one filter clause
pub fn compile_clause(clause: &FilterClause) -> Predicate {
    match &clause.condition {
        ClauseCondition::Known(condition) => {
            compile_condition(*condition, &clause.id, &clause.value)
        }
        ClauseCondition::Unrecognized(raw) => {
            warn!(
                question_id = %clause.id,
                condition = %raw,
                "unrecognized filter condition reached the compiler; excluding all documents"
            );
            Predicate::never()
        }
    }
}

fn compile_condition(condition: Condition, id: &str, value: &QuestionValue) -> Predicate {
    match condition {
        Condition::Equals => question_equals(id, value),
        Condition::DoesNotEqual => Predicate::not(question_equals(id, value)),
        Condition::GreaterThan => Predicate::compare(
            Operand::Max(id.to_string()),
            CompareOp::Gt,
            Literal::Value(value.clone()),
        ),
        Condition::LessThan => Predicate::compare(
            Operand::Min(id.to_string()),
            CompareOp::Lt,
            Literal::Value(value.clone()),
        ),
    }
}

fn question_equals(id: &str, value: &QuestionValue) -> Predicate {
    Predicate::exists(
        Subject::Questions,
        vec![
            ElementTest::IdEquals(id.to_string()),
            ElementTest::ValueEquals(value.clone()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SubmissionStatus;
    use chrono::{TimeZone, Utc};

    fn status_term(status: SubmissionStatus) -> Predicate {
        Predicate::compare(
            Operand::Field(DocumentField::Status),
            CompareOp::Eq,
            Literal::Status(status),
        )
    }

    #[test]
    fn test_default_spec_is_status_only() {
        let predicate = compile(&QuerySpec::default());
        assert_eq!(
            predicate,
            Predicate::and(vec![status_term(SubmissionStatus::Finished)])
        );
    }

    #[test]
    fn test_both_dates_strict_interval() {
        let after = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let spec = QuerySpec::default().after(after).before(before);

        let predicate = compile(&spec);
        let terms = predicate.terms();
        assert_eq!(terms.len(), 2);
        assert_eq!(
            terms[0],
            &Predicate::and(vec![
                Predicate::compare(
                    Operand::Field(DocumentField::SubmissionTime),
                    CompareOp::Gt,
                    Literal::Timestamp(after),
                ),
                Predicate::compare(
                    Operand::Field(DocumentField::SubmissionTime),
                    CompareOp::Lt,
                    Literal::Timestamp(before),
                ),
            ])
        );
    }

    #[test]
    fn test_single_date_bound() {
        let before = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let predicate = compile(&QuerySpec::default().before(before));
        assert_eq!(
            predicate.terms()[0],
            &Predicate::compare(
                Operand::Field(DocumentField::SubmissionTime),
                CompareOp::Lt,
                Literal::Timestamp(before),
            )
        );
    }

    #[test]
    fn test_filters_carry_null_guard() {
        let spec = QuerySpec::default().with_filter(FilterClause::equals("q1", "blue"));
        let predicate = compile(&spec);
        let terms = predicate.terms();
        assert_eq!(terms.len(), 2);

        let filters = terms[1].terms();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[1], &null_guard());
    }

    #[test]
    fn test_does_not_equal_negates_equals() {
        let eq = compile_clause(&FilterClause::equals("q1", "blue"));
        let ne = compile_clause(&FilterClause::does_not_equal("q1", "blue"));
        assert_eq!(ne, Predicate::not(eq));
    }

    #[test]
    fn test_range_clauses_use_aggregates() {
        let gt = compile_clause(&FilterClause::greater_than("q1", 10));
        assert!(matches!(
            gt,
            Predicate::Compare { operand: Operand::Max(ref id), op: CompareOp::Gt, .. } if id == "q1"
        ));

        let lt = compile_clause(&FilterClause::less_than("q1", 10));
        assert!(matches!(
            lt,
            Predicate::Compare { operand: Operand::Min(_), op: CompareOp::Lt, .. }
        ));
    }

    #[test]
    fn test_unrecognized_condition_matches_nothing() {
        let clause = FilterClause {
            id: "q1".into(),
            condition: ClauseCondition::Unrecognized("contains".into()),
            value: QuestionValue::from("x"),
        };
        assert!(compile_clause(&clause).is_never());
    }

    #[test]
    fn test_empty_filters_list_ignored() {
        let mut spec = QuerySpec::default();
        spec.filters = Some(Vec::new());
        assert!(!compile(&spec).touches_questions());
    }
}
