//! services/gateway/src/web/proxy.rs
//!
//! The relay step shared by every route: forward once, hand back the backend's
//! status and JSON body unchanged.

use crate::error::ProxyError;
use crate::web::state::AppState;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use medisearch_core::ports::{ForwardRequest, Forwarded};
use medisearch_core::validation::Rejection;
use tracing::{debug, warn};

/// Forwards `request` and relays the answer. Transport and parse failures become a 500.
pub async fn relay(
    state: &AppState,
    route: &'static str,
    request: ForwardRequest,
) -> Result<Response, ProxyError> {
    let path = request.path();
    let forwarded = state
        .backend
        .forward(request)
        .await
        .map_err(|e| ProxyError::Internal(format!("{} -> {}: {}", route, path, e)))?;
    relayed(route, forwarded)
}

pub fn relayed(route: &'static str, forwarded: Forwarded) -> Result<Response, ProxyError> {
    let status = StatusCode::from_u16(forwarded.status).map_err(|e| {
        ProxyError::Internal(format!("{}: backend status {}: {}", route, forwarded.status, e))
    })?;
    if forwarded.is_success() {
        debug!(route, status = forwarded.status, "relayed");
    } else {
        warn!(route, status = forwarded.status, "backend reported failure");
    }
    Ok((status, Json(forwarded.body)).into_response())
}

/// Logs and converts a boundary rejection.
pub fn rejected(route: &'static str, rejection: Rejection) -> ProxyError {
    debug!(route, %rejection, "request rejected");
    rejection.into()
}
