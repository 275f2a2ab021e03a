//! # HTTP Server Module
//!
//! Axum transport over the query executor.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/v1/api/forms/:form_id/filteredResponses` - Filtered, paginated responses

pub mod config;
pub mod errors;
pub mod form_routes;
pub mod health_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use form_routes::{form_routes, FormState};
pub use server::{build_router, HttpServer};
