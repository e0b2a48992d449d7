//! services/gateway/src/adapters/backend.rs
//!
//! This module contains the adapter that relays proxy requests to the search
//! backend. It implements the `BackendService` port from the `core` crate.

use async_trait::async_trait;
use medisearch_core::ports::{BackendService, ForwardMethod, ForwardRequest, Forwarded, PortError, PortResult};
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Client, Method, Url,
};
use serde_json::Value;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `BackendService` port over HTTP.
#[derive(Clone)]
pub struct BackendAdapter {
    client: Client,
    base_url: Url,
}

impl BackendAdapter {
    /// Creates a new `BackendAdapter` for the backend at `base_url`.
    pub fn new(client: Client, base_url: &str) -> PortResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| PortError::Unexpected(format!("invalid backend URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(PortError::Unexpected(format!(
                "backend URL '{}' cannot carry a path",
                base_url
            )));
        }
        Ok(Self { client, base_url })
    }

    /// Builds an adapter with its own connection pool. Timeouts are left to
    /// reqwest's defaults.
    pub fn connect(base_url: &str) -> PortResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| PortError::Unexpected(format!("failed to build HTTP client: {}", e)))?;
        Self::new(client, base_url)
    }

    fn url_for(&self, request: &ForwardRequest) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "v1"])
                .extend(&request.segments);
        }
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        url
    }
}

fn method_for(method: ForwardMethod) -> Method {
    match method {
        ForwardMethod::Get => Method::GET,
        ForwardMethod::Post => Method::POST,
        ForwardMethod::Delete => Method::DELETE,
    }
}

//=========================================================================================
// `BackendService` Trait Implementation
//=========================================================================================

#[async_trait]
impl BackendService for BackendAdapter {
    /// Sends the request once and returns whatever status the backend chose.
    async fn forward(&self, request: ForwardRequest) -> PortResult<Forwarded> {
        let url = self.url_for(&request);

        let mut builder = self
            .client
            .request(method_for(request.method), url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(authorization) = &request.authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("backend unreachable: {}", e)))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PortError::Unexpected(format!("failed to read backend response: {}", e)))?;
        let body: Value = serde_json::from_slice(&bytes).map_err(|e| {
            PortError::Unexpected(format!("backend answered {} with a non-JSON body: {}", status, e))
        })?;

        Ok(Forwarded { status, body })
    }
}
