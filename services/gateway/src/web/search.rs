//! services/gateway/src/web/search.rs
//!
//! The search route and the backend health probe.

use crate::error::ProxyError;
use crate::web::extractors::{authorization, JsonPayload};
use crate::web::proxy::{rejected, relay, relayed};
use crate::web::state::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use medisearch_core::domain::HealthCheck;
use medisearch_core::ports::ForwardRequest;
use medisearch_core::validation::SearchPayload;
use std::sync::Arc;
use tracing::{error, warn};

/// POST /api/v1/medical/search - Run a literature search
///
/// Authorization is optional; when present the backend saves the search to history.
#[utoipa::path(
    post,
    path = "/api/v1/medical/search",
    request_body = SearchPayload,
    params(
        ("Authorization" = Option<String>, Header, description = "Bearer token, to save the search")
    ),
    responses(
        (status = 200, description = "Answer, sources and validation"),
        (status = 400, description = "Query must be at least 3 characters"),
        (status = 422, description = "Filters do not match the accepted structure"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    JsonPayload { payload, raw }: JsonPayload<SearchPayload>,
) -> Result<Response, ProxyError> {
    payload.validate().map_err(|r| rejected("search", r))?;
    let request = ForwardRequest::post(&["medical", "search"], raw)
        .with_authorization(authorization(&headers));
    relay(&state, "search", request).await
}

/// GET /api/v1/medical/health - Backend health
///
/// Never fails outright: if the backend cannot answer, a synthesized
/// all-services-down report is returned with 503.
#[utoipa::path(
    get,
    path = "/api/v1/medical/health",
    responses(
        (status = 200, description = "Backend health report"),
        (status = 503, description = "Backend unavailable; every service reported down")
    )
)]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Response {
    let outcome = state
        .backend
        .forward(ForwardRequest::get(&["medical", "health"]))
        .await;

    match outcome {
        Ok(forwarded) if forwarded.is_success() => match relayed("health", forwarded) {
            Ok(response) => response,
            Err(e) => {
                error!("health relay failed: {}", e);
                unhealthy()
            }
        },
        Ok(forwarded) => {
            warn!(status = forwarded.status, "backend health check failed");
            unhealthy()
        }
        Err(e) => {
            error!("health check error: {}", e);
            unhealthy()
        }
    }
}

fn unhealthy() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(HealthCheck::unreachable(Utc::now())),
    )
        .into_response()
}
