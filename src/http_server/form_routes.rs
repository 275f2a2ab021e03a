//! Form response routes
//!
//! `GET /v1/api/forms/:form_id/filteredResponses`

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, info_span, Instrument};

use crate::executor::QueryExecutor;
use crate::model::ResultEnvelope;
use crate::validation::{check_form_id, QueryParams};

use super::errors::{ApiError, ApiResult};

/// State shared by form handlers
pub struct FormState {
    pub executor: QueryExecutor,
    /// Id of the only form this server mirrors
    pub form_id: String,
}

impl FormState {
    pub fn new(executor: QueryExecutor, form_id: impl Into<String>) -> Self {
        Self {
            executor,
            form_id: form_id.into(),
        }
    }
}

/// Create form routes
pub fn form_routes(state: Arc<FormState>) -> Router {
    Router::new()
        .route(
            "/v1/api/forms/:form_id/filteredResponses",
            get(filtered_responses),
        )
        .with_state(state)
}

async fn filtered_responses(
    State(state): State<Arc<FormState>>,
    Path(form_id): Path<String>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<Json<ResultEnvelope>> {
    check_form_id(&form_id, &state.form_id)?;

    let Query(params) = query.map_err(|e| ApiError::MalformedQuery(e.body_text()))?;
    let spec = QueryParams::parse(&params)?;
    debug!(?spec, "validated query parameters");

    let envelope = state
        .executor
        .orchestrate(&spec)
        .instrument(info_span!("filtered_responses", form_id = %form_id))
        .await?;

    Ok(Json(envelope))
}
