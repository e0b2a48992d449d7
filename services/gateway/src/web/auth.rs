//! services/gateway/src/web/auth.rs
//!
//! Authentication routes: register, login and "who am I". Passwords and tokens
//! are forwarded untouched and never logged.

use crate::error::ProxyError;
use crate::web::extractors::{JsonPayload, RequireAuthorization};
use crate::web::proxy::{rejected, relay};
use crate::web::state::AppState;
use axum::{extract::State, response::Response};
use medisearch_core::ports::ForwardRequest;
use medisearch_core::validation::{LoginPayload, RegisterPayload};
use std::sync::Arc;

/// POST /api/v1/auth/register - Create an account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Missing required fields, or rejected by the backend"),
        (status = 422, description = "Password or full name too short"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    JsonPayload { payload, raw }: JsonPayload<RegisterPayload>,
) -> Result<Response, ProxyError> {
    payload.validate().map_err(|r| rejected("register", r))?;
    relay(&state, "register", ForwardRequest::post(&["auth", "register"], raw)).await
}

/// POST /api/v1/auth/login - Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token issued"),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Incorrect email or password"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    JsonPayload { payload, raw }: JsonPayload<LoginPayload>,
) -> Result<Response, ProxyError> {
    payload.validate().map_err(|r| rejected("login", r))?;
    relay(&state, "login", ForwardRequest::post(&["auth", "login"], raw)).await
}

/// GET /api/v1/auth/me - The account behind the bearer token
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    params(
        ("Authorization" = String, Header, description = "Bearer token")
    ),
    responses(
        (status = 200, description = "Current account"),
        (status = 401, description = "Missing or rejected authorization"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    RequireAuthorization(authorization): RequireAuthorization,
) -> Result<Response, ProxyError> {
    let request = ForwardRequest::get(&["auth", "me"]).with_authorization(Some(authorization));
    relay(&state, "me", request).await
}
