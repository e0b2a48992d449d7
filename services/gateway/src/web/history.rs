//! services/gateway/src/web/history.rs
//!
//! Search history routes. All of them require an `Authorization` header.

use crate::error::ProxyError;
use crate::web::extractors::{HistoryParams, RequireAuthorization};
use crate::web::proxy::relay;
use crate::web::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Response,
};
use medisearch_core::ports::ForwardRequest;
use std::sync::Arc;

/// GET /api/v1/history - Page through the caller's saved searches
#[utoipa::path(
    get,
    path = "/api/v1/history",
    params(
        ("Authorization" = String, Header, description = "Bearer token"),
        ("limit" = Option<u32>, Query, description = "Page size, default 20"),
        ("skip" = Option<u32>, Query, description = "Entries to skip, default 0")
    ),
    responses(
        (status = 200, description = "Total count and one page of searches"),
        (status = 401, description = "Missing authorization header"),
        (status = 422, description = "Paging parameters are not numbers"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_history_handler(
    State(state): State<Arc<AppState>>,
    RequireAuthorization(authorization): RequireAuthorization,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Response, ProxyError> {
    let Query(params) = params.map_err(|e| ProxyError::Unprocessable(e.body_text()))?;
    let request = ForwardRequest::get(&["history", ""])
        .with_query("limit", params.limit)
        .with_query("skip", params.skip)
        .with_authorization(Some(authorization));
    relay(&state, "history", request).await
}

/// GET /api/v1/history/{search_id} - One saved search in full
#[utoipa::path(
    get,
    path = "/api/v1/history/{search_id}",
    params(
        ("search_id" = String, Path, description = "Saved search id"),
        ("Authorization" = String, Header, description = "Bearer token")
    ),
    responses(
        (status = 200, description = "The saved search"),
        (status = 401, description = "Missing authorization header"),
        (status = 404, description = "Search not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn search_detail_handler(
    State(state): State<Arc<AppState>>,
    RequireAuthorization(authorization): RequireAuthorization,
    Path(search_id): Path<String>,
) -> Result<Response, ProxyError> {
    let request =
        ForwardRequest::get(&["history", search_id.as_str()]).with_authorization(Some(authorization));
    relay(&state, "history_detail", request).await
}

/// DELETE /api/v1/history/{search_id} - Remove a saved search
#[utoipa::path(
    delete,
    path = "/api/v1/history/{search_id}",
    params(
        ("search_id" = String, Path, description = "Saved search id"),
        ("Authorization" = String, Header, description = "Bearer token")
    ),
    responses(
        (status = 200, description = "Search deleted"),
        (status = 401, description = "Missing authorization header"),
        (status = 404, description = "Search not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_search_handler(
    State(state): State<Arc<AppState>>,
    RequireAuthorization(authorization): RequireAuthorization,
    Path(search_id): Path<String>,
) -> Result<Response, ProxyError> {
    let request =
        ForwardRequest::delete(&["history", search_id.as_str()]).with_authorization(Some(authorization));
    relay(&state, "history_delete", request).await
}
