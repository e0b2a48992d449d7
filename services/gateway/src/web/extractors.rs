//! services/gateway/src/web/extractors.rs
//!
//! Request extractors shared by the proxy routes.

use crate::client::DEFAULT_HISTORY_LIMIT;
use crate::error::ProxyError;
use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap},
};
use bytes::Bytes;
use medisearch_core::validation::Rejection;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// The inbound `Authorization` header, if present and non-empty.
pub fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// The raw `Authorization` header of a protected route. Missing means 401.
#[derive(Debug, Clone)]
pub struct RequireAuthorization(pub String);

impl<S: Send + Sync> FromRequestParts<S> for RequireAuthorization {
    type Rejection = ProxyError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match authorization(&parts.headers) {
            Some(value) => Ok(Self(value)),
            None => {
                debug!(path = %parts.uri.path(), "missing authorization header");
                Err(Rejection::MissingAuthorization.into())
            }
        }
    }
}

/// A JSON body read twice: as `T` for validation, and as the raw value to forward.
///
/// Malformed JSON is a 500; JSON that does not fit `T` is a 422.
#[derive(Debug)]
pub struct JsonPayload<T> {
    pub payload: T,
    pub raw: Value,
}

impl<S, T> FromRequest<S> for JsonPayload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ProxyError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ProxyError::Internal(format!("failed to read request body: {}", e)))?;
        let raw: Value = serde_json::from_slice(&bytes)
            .map_err(|e| ProxyError::Internal(format!("malformed JSON body: {}", e)))?;
        let payload = T::deserialize(&raw).map_err(|e| ProxyError::Unprocessable(e.to_string()))?;
        Ok(Self { payload, raw })
    }
}

/// Paging for the history list. Defaults match the backend's.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HistoryParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub skip: u32,
}

fn default_limit() -> u32 {
    DEFAULT_HISTORY_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn empty_authorization_counts_as_missing() {
        let mut headers = HeaderMap::new();
        assert_eq!(authorization(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(""));
        assert_eq!(authorization(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(authorization(&headers).as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn history_params_default_to_first_page() {
        let params: HistoryParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!((params.limit, params.skip), (20, 0));
    }
}
