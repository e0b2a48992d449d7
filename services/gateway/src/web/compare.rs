//! services/gateway/src/web/compare.rs
//!
//! Side-by-side comparison of saved searches, and citation export.

use crate::error::ProxyError;
use crate::web::extractors::{JsonPayload, RequireAuthorization};
use crate::web::proxy::{rejected, relay};
use crate::web::state::AppState;
use axum::{extract::State, response::Response};
use medisearch_core::ports::ForwardRequest;
use medisearch_core::validation::{CitationPayload, ComparePayload};
use std::sync::Arc;
use tracing::debug;

/// POST /api/v1/compare - Compare two or more saved searches
#[utoipa::path(
    post,
    path = "/api/v1/compare",
    request_body = ComparePayload,
    params(
        ("Authorization" = String, Header, description = "Bearer token")
    ),
    responses(
        (status = 200, description = "One summary per search"),
        (status = 400, description = "At least 2 search IDs required"),
        (status = 401, description = "Missing authorization header"),
        (status = 404, description = "A search was not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn compare_handler(
    State(state): State<Arc<AppState>>,
    RequireAuthorization(authorization): RequireAuthorization,
    JsonPayload { payload, raw }: JsonPayload<ComparePayload>,
) -> Result<Response, ProxyError> {
    payload.validate().map_err(|r| rejected("compare", r))?;
    let request =
        ForwardRequest::post(&["compare", ""], raw).with_authorization(Some(authorization));
    relay(&state, "compare", request).await
}

/// POST /api/v1/citations - Render citations for saved sources
#[utoipa::path(
    post,
    path = "/api/v1/citations",
    request_body = CitationPayload,
    params(
        ("Authorization" = String, Header, description = "Bearer token")
    ),
    responses(
        (status = 200, description = "Rendered citations"),
        (status = 400, description = "No paper ids, or unknown format"),
        (status = 401, description = "Missing authorization header"),
        (status = 404, description = "No sources found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn citations_handler(
    State(state): State<Arc<AppState>>,
    RequireAuthorization(authorization): RequireAuthorization,
    JsonPayload { payload, raw }: JsonPayload<CitationPayload>,
) -> Result<Response, ProxyError> {
    let format = payload.validate().map_err(|r| rejected("citations", r))?;
    debug!(
        format = format.as_str(),
        papers = payload.paper_ids.as_ref().map_or(0, Vec::len),
        "exporting citations"
    );
    let request =
        ForwardRequest::post(&["citations", ""], raw).with_authorization(Some(authorization));
    relay(&state, "citations", request).await
}
