//! In-memory evaluation of predicate trees
//!
//! No type coercion: a comparison between values of different types is
//! false. MAX/MIN ignore absent values and are undefined when no question
//! carries the id, in which case the comparison is false.

use std::cmp::Ordering;

use crate::model::{Question, QuestionValue, Submission};
use crate::planner::{CompareOp, DocumentField, ElementTest, Literal, Operand, Predicate, Subject};

/// Checks if a submission satisfies a predicate
pub fn matches(submission: &Submission, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::And(children) => children.iter().all(|child| matches(submission, child)),
        Predicate::Not(inner) => !matches(submission, inner),
        Predicate::Exists { subject, tests } => exists(submission, *subject, tests),
        Predicate::Compare {
            operand,
            op,
            literal,
        } => compare(submission, operand, *op, literal),
    }
}

fn exists(submission: &Submission, subject: Subject, tests: &[ElementTest]) -> bool {
    match subject {
        Subject::Questions => submission
            .questions
            .iter()
            .any(|question| tests.iter().all(|test| element_passes(question, test))),
    }
}

fn element_passes(question: &Question, test: &ElementTest) -> bool {
    match test {
        ElementTest::IdEquals(id) => question.id == *id,
        ElementTest::ValueEquals(expected) => question.value.as_ref() == Some(expected),
        ElementTest::ValueAbsent => question.value.is_none(),
    }
}

fn compare(submission: &Submission, operand: &Operand, op: CompareOp, literal: &Literal) -> bool {
    let ordering = match (operand, literal) {
        (Operand::Field(DocumentField::SubmissionTime), Literal::Timestamp(ts)) => {
            Some(submission.submission_time.cmp(ts))
        }
        (Operand::Field(DocumentField::Status), Literal::Status(status)) => {
            Some(submission.status.as_str().cmp(status.as_str()))
        }
        (Operand::Max(id), Literal::Value(expected)) => {
            aggregate(submission, id, Ordering::Greater).and_then(|v| v.compare_same_type(expected))
        }
        (Operand::Min(id), Literal::Value(expected)) => {
            aggregate(submission, id, Ordering::Less).and_then(|v| v.compare_same_type(expected))
        }
        _ => None,
    };

    ordering.is_some_and(|ordering| op_holds(op, ordering))
}

/// Largest (`Greater`) or smallest (`Less`) present value for `id`
fn aggregate<'a>(submission: &'a Submission, id: &'a str, keep: Ordering) -> Option<&'a QuestionValue> {
    submission.values_for(id).flatten().reduce(|best, candidate| {
        if candidate.aggregate_cmp(best) == keep {
            candidate
        } else {
            best
        }
    })
}

fn op_holds(op: CompareOp, ordering: Ordering) -> bool {
    match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Lt => ordering == Ordering::Less,
    }
}
