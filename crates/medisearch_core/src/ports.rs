//! crates/medisearch_core/src/ports.rs
//!
//! Defines the service contracts (traits) at the edges of the gateway tier.
//! The core depends only on these, never on a concrete HTTP client or storage.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Account, Credentials, NewAccount, Token};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The remote side answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },
    /// Local token persistence failed.
    #[error("Token storage error: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Token Persistence
//=========================================================================================

/// Key under which the bearer token is persisted.
pub const TOKEN_KEY: &str = "auth_token";

/// Holds at most one bearer token.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> PortResult<Option<String>>;
    fn save(&self, token: &str) -> PortResult<()>;
    /// Removing an absent token is not an error.
    fn clear(&self) -> PortResult<()>;
}

//=========================================================================================
// Identity (driven by the session context)
//=========================================================================================

#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Exchanges credentials for a token and persists it.
    async fn login(&self, credentials: &Credentials) -> PortResult<Token>;

    async fn register(&self, account: &NewAccount) -> PortResult<Account>;

    /// "Who am I" for the persisted token.
    async fn current_user(&self) -> PortResult<Account>;

    /// Drops the persisted token. Never touches the network.
    fn logout(&self) -> PortResult<()>;
}

//=========================================================================================
// Backend Forwarding (driven by the proxy routes)
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardMethod {
    Get,
    Post,
    Delete,
}

/// One request to relay to the backend, rooted at `<backend>/api/v1/`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardRequest {
    pub method: ForwardMethod,
    /// Path segments below `api/v1`. A trailing empty segment yields a trailing slash.
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    /// Sent as-is in the `Authorization` header.
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

impl ForwardRequest {
    pub fn new(method: ForwardMethod, segments: &[&str]) -> Self {
        Self {
            method,
            segments: segments.iter().map(|s| s.to_string()).collect(),
            query: Vec::new(),
            authorization: None,
            body: None,
        }
    }

    pub fn get(segments: &[&str]) -> Self {
        Self::new(ForwardMethod::Get, segments)
    }

    pub fn post(segments: &[&str], body: Value) -> Self {
        Self::new(ForwardMethod::Post, segments).with_body(body)
    }

    pub fn delete(segments: &[&str]) -> Self {
        Self::new(ForwardMethod::Delete, segments)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_authorization(mut self, authorization: Option<String>) -> Self {
        self.authorization = authorization;
        self
    }

    /// Path below the backend origin, for logging.
    pub fn path(&self) -> String {
        format!("/api/v1/{}", self.segments.join("/"))
    }
}

/// What the backend answered: status plus its JSON body, untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Forwarded {
    pub status: u16,
    pub body: Value,
}

impl Forwarded {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait BackendService: Send + Sync {
    /// Relays one request. Any status is `Ok`; transport or body-parse failures are `Err`.
    async fn forward(&self, request: ForwardRequest) -> PortResult<Forwarded>;
}
