//! formfilter - filtered, paginated views over mirrored form submissions
//!
//! A request's query parameters are validated into a
//! [`QuerySpec`](model::QuerySpec), compiled into a store-agnostic predicate
//! tree, and executed against a [`DocumentStore`](store::DocumentStore) to
//! produce a paginated result envelope.
//!
//! # Modules
//!
//! - `model`: submissions, query spec, result envelope
//! - `validation`: raw parameters to `QuerySpec`
//! - `planner`: predicate compiler, query plan, explain output
//! - `store`: document store trait, in-memory adapter, MongoDB translation
//! - `executor`: count, fetch and envelope assembly
//! - `ingest`: mirroring submissions from the form platform
//! - `http_server`: axum transport
//! - `config`, `observability`, `cli`: process plumbing

pub mod cli;
pub mod config;
pub mod executor;
pub mod http_server;
pub mod ingest;
pub mod model;
pub mod observability;
pub mod planner;
pub mod store;
pub mod validation;
