//! Filter predicate compiler
//!
//! Turns a normalized [`QuerySpec`](crate::model::QuerySpec) into a
//! store-agnostic [`Predicate`] plus the [`FetchOptions`] that drive sorting,
//! pagination and projection.
//!
//! # Design Principles
//!
//! - Deterministic: same spec → equal plan
//! - Pure: no I/O, never fails
//! - Store-agnostic: adapters translate the tree, the planner knows no
//!   query language

mod ast;
mod compiler;
mod explain;
mod plan;

pub use ast::{
    CompareOp, DocumentField, ElementTest, Literal, Operand, Predicate, SortSpec, Subject,
};
pub use compiler::{compile, compile_clause, null_guard};
pub use explain::ExplainPlan;
pub use plan::{FetchOptions, QueryPlan};
