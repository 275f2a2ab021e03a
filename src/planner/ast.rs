//! Store-agnostic predicate AST
//!
//! A compiled query is a tree of four node kinds: AND, NOT, EXISTS over the
//! questions collection, and COMPARE of an operand with a literal. Store
//! adapters translate the tree; nothing here knows any query language.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::model::{QuestionValue, SortOrder, SubmissionStatus};

/// Top-level document fields predicates can address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentField {
    SubmissionTime,
    Status,
}

impl DocumentField {
    /// Stored field name
    pub fn name(&self) -> &'static str {
        match self {
            DocumentField::SubmissionTime => "submissionTime",
            DocumentField::Status => "status",
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Gt,
    Lt,
}

impl CompareOp {
    /// Returns the operation name for explain output
    pub fn op_name(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
        }
    }
}

/// Left-hand side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A top-level document field
    Field(DocumentField),
    /// Largest value among questions with this id
    Max(String),
    /// Smallest value among questions with this id
    Min(String),
}

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Timestamp(DateTime<Utc>),
    Status(SubmissionStatus),
    Value(QuestionValue),
}

/// Collections an EXISTS node can range over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Questions,
}

impl Subject {
    pub fn name(&self) -> &'static str {
        match self {
            Subject::Questions => "questions",
        }
    }
}

/// Test applied to one element of an EXISTS subject
#[derive(Debug, Clone, PartialEq)]
pub enum ElementTest {
    IdEquals(String),
    /// Exact type-and-value match
    ValueEquals(QuestionValue),
    /// Value is explicitly null
    ValueAbsent,
}

/// Predicate expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// All children hold. An empty AND holds.
    And(Vec<Predicate>),
    Not(Box<Predicate>),
    /// Some element of `subject` passes every test
    Exists {
        subject: Subject,
        tests: Vec<ElementTest>,
    },
    Compare {
        operand: Operand,
        op: CompareOp,
        literal: Literal,
    },
}

impl Predicate {
    pub fn and(children: Vec<Predicate>) -> Self {
        Predicate::And(children)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    pub fn exists(subject: Subject, tests: Vec<ElementTest>) -> Self {
        Predicate::Exists { subject, tests }
    }

    pub fn compare(operand: Operand, op: CompareOp, literal: Literal) -> Self {
        Predicate::Compare {
            operand,
            op,
            literal,
        }
    }

    /// Predicate that matches no document: NOT(AND[])
    pub fn never() -> Self {
        Predicate::not(Predicate::and(Vec::new()))
    }

    /// Returns true if this is the match-nothing predicate
    pub fn is_never(&self) -> bool {
        matches!(self, Predicate::Not(inner) if matches!(inner.as_ref(), Predicate::And(c) if c.is_empty()))
    }

    /// Children of a top-level AND, or the predicate itself
    pub fn terms(&self) -> Vec<&Predicate> {
        match self {
            Predicate::And(children) => children.iter().collect(),
            other => vec![other],
        }
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        match self {
            Predicate::And(children) => 1 + children.iter().map(Predicate::node_count).sum::<usize>(),
            Predicate::Not(inner) => 1 + inner.node_count(),
            Predicate::Exists { .. } | Predicate::Compare { .. } => 1,
        }
    }

    /// Returns true if any node inspects question values
    pub fn touches_questions(&self) -> bool {
        match self {
            Predicate::And(children) => children.iter().any(Predicate::touches_questions),
            Predicate::Not(inner) => inner.touches_questions(),
            Predicate::Exists { .. } => true,
            Predicate::Compare { operand, .. } => !matches!(operand, Operand::Field(_)),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Field(field) => f.write_str(field.name()),
            Operand::Max(id) => write!(f, "MAX(questions[id == {:?}].value)", id),
            Operand::Min(id) => write!(f, "MIN(questions[id == {:?}].value)", id),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Timestamp(ts) => f.write_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Literal::Status(status) => write!(f, "{:?}", status.as_str()),
            Literal::Value(value) => write!(f, "{}", value),
        }
    }
}

impl fmt::Display for ElementTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementTest::IdEquals(id) => write!(f, "id == {:?}", id),
            ElementTest::ValueEquals(value) => write!(f, "value == {}", value),
            ElementTest::ValueAbsent => f.write_str("value IS NULL"),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::And(children) => {
                f.write_str("AND(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
            Predicate::Not(inner) => write!(f, "NOT({})", inner),
            Predicate::Exists { subject, tests } => {
                write!(f, "EXISTS {}[", subject.name())?;
                for (i, test) in tests.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" AND ")?;
                    }
                    write!(f, "{}", test)?;
                }
                f.write_str("]")
            }
            Predicate::Compare {
                operand,
                op,
                literal,
            } => write!(f, "{} {} {}", operand, op.op_name(), literal),
        }
    }
}

/// Sort field and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    /// Field to sort by
    pub field: DocumentField,
    /// Sort direction
    pub direction: SortOrder,
}

impl SortSpec {
    pub fn asc(field: DocumentField) -> Self {
        Self {
            field,
            direction: SortOrder::Asc,
        }
    }

    pub fn desc(field: DocumentField) -> Self {
        Self {
            field,
            direction: SortOrder::Desc,
        }
    }
}
