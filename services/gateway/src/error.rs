//! services/gateway/src/error.rs
//!
//! Defines the error types for the gateway service: `ApiError` for startup
//! failures, `ProxyError` for failures answered to an inbound request.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use medisearch_core::ports::PortError;
use medisearch_core::validation::Rejection;
use serde_json::json;
use tracing::error;

/// Detail sent for every transport or parse failure. Nothing else leaks.
pub const INTERNAL_DETAIL: &str = "Internal server error";

/// The primary error type for the `gateway` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A request-time failure, rendered as `{ "detail": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Refused at the boundary; the backend was not contacted.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// Well-formed JSON that does not fit the request contract.
    #[error("{0}")]
    Unprocessable(String),

    /// Transport or parse failure. The cause is logged, never returned.
    #[error("{0}")]
    Internal(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Rejected(rejection) => rejection_status(*rejection),
            ProxyError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            ProxyError::Internal(_) => INTERNAL_DETAIL.to_string(),
            other => other.to_string(),
        }
    }
}

fn rejection_status(rejection: Rejection) -> StatusCode {
    match rejection {
        Rejection::MissingAuthorization => StatusCode::UNAUTHORIZED,
        Rejection::PasswordTooShort | Rejection::FullNameTooShort => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        Rejection::MissingCredentials
        | Rejection::MissingRegistrationFields
        | Rejection::QueryTooShort
        | Rejection::TooFewSearchIds
        | Rejection::NoPaperIds
        | Rejection::InvalidCitationFormat => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        if let ProxyError::Internal(cause) = &self {
            error!("proxy request failed: {}", cause);
        }
        let body = json!({ "detail": self.detail() });
        (self.status(), Json(body)).into_response()
    }
}
