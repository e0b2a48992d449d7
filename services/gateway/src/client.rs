//! services/gateway/src/client.rs
//!
//! The typed client for the gateway's `/api/v1` surface.
//!
//! Every call attaches `Authorization: Bearer <token>` when the token store holds
//! a token, sends JSON, and turns a non-success status into `ClientError::Api`
//! carrying the backend's `detail`. One attempt per call; no retries.

use async_trait::async_trait;
use medisearch_core::domain::{
    Account, CitationRequest, CitationResponse, CompareRequest, CompareResponse, Credentials,
    HealthCheck, HistoryPage, NewAccount, SavedSearch, SearchRequest, SearchResult, Token,
};
use medisearch_core::ports::{IdentityService, PortError, PortResult, TokenStore};
use reqwest::{header::CONTENT_TYPE, Client, Method, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_HISTORY_LIMIT: u32 = 20;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Non-success status. `message` is the `detail` or `API Error: <status>`.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error(transparent)]
    Storage(PortError),

    #[error("invalid gateway URL: {0}")]
    BaseUrl(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ClientError> for PortError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { status, message } => PortError::Api { status, message },
            ClientError::Storage(inner) => inner,
            other => PortError::Unexpected(other.to_string()),
        }
    }
}

/// Picks the message for a failed call from its body.
fn error_message(status: u16, body: &[u8]) -> String {
    let detail = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|mut value| value.get_mut("detail").map(Value::take));
    match detail {
        Some(Value::String(detail)) if !detail.is_empty() => detail,
        Some(Value::Null) | Some(Value::String(_)) | None => format!("API Error: {}", status),
        Some(other) => other.to_string(),
    }
}

//=========================================================================================
// The Client
//=========================================================================================

pub struct ApiClient {
    http: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// `base_url` is the gateway origin, e.g. `http://localhost:3000`.
    pub fn new(http: Client, base_url: &str, tokens: Arc<dyn TokenStore>) -> ClientResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::BaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::BaseUrl(format!("'{}' cannot carry a path", base_url)));
        }
        Ok(Self { http, base_url, tokens })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["api", "v1"]).extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        let mut builder = self
            .http
            .request(method, self.endpoint(segments))
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = self.tokens.load().map_err(ClientError::Storage)? {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = error_message(status.as_u16(), &body);
            debug!(status = status.as_u16(), %message, "gateway call failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        let builder = self.request(Method::GET, segments)?;
        self.execute(builder).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> ClientResult<T> {
        let builder = self.request(Method::POST, segments)?.json(body);
        self.execute(builder).await
    }

    // --- Authentication ---

    pub async fn register(&self, account: &NewAccount) -> ClientResult<Account> {
        self.post(&["auth", "register"], account).await
    }

    /// Logs in and persists the returned token.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<Token> {
        let token: Token = self.post(&["auth", "login"], credentials).await?;
        self.tokens
            .save(&token.access_token)
            .map_err(ClientError::Storage)?;
        Ok(token)
    }

    pub async fn current_user(&self) -> ClientResult<Account> {
        self.get(&["auth", "me"]).await
    }

    /// Forgets the token. No network call.
    pub fn logout(&self) -> ClientResult<()> {
        self.tokens.clear().map_err(ClientError::Storage)
    }

    // --- Search ---

    pub async fn search(&self, request: &SearchRequest) -> ClientResult<SearchResult> {
        self.post(&["medical", "search"], request).await
    }

    pub async fn check_health(&self) -> ClientResult<HealthCheck> {
        self.get(&["medical", "health"]).await
    }

    // --- History ---

    pub async fn history(&self, limit: u32, skip: u32) -> ClientResult<HistoryPage> {
        let builder = self
            .request(Method::GET, &["history"])?
            .query(&[("limit", limit), ("skip", skip)]);
        self.execute(builder).await
    }

    pub async fn search_detail(&self, search_id: &str) -> ClientResult<SavedSearch> {
        self.get(&["history", search_id]).await
    }

    pub async fn delete_search(&self, search_id: &str) -> ClientResult<()> {
        let builder = self.request(Method::DELETE, &["history", search_id])?;
        self.execute::<Value>(builder).await?;
        Ok(())
    }

    // --- Compare & Citations ---

    pub async fn compare_searches(&self, request: &CompareRequest) -> ClientResult<CompareResponse> {
        self.post(&["compare"], request).await
    }

    pub async fn export_citations(&self, request: &CitationRequest) -> ClientResult<CitationResponse> {
        self.post(&["citations"], request).await
    }
}

//=========================================================================================
// `IdentityService` Trait Implementation
//=========================================================================================

#[async_trait]
impl IdentityService for ApiClient {
    async fn login(&self, credentials: &Credentials) -> PortResult<Token> {
        Ok(ApiClient::login(self, credentials).await?)
    }

    async fn register(&self, account: &NewAccount) -> PortResult<Account> {
        Ok(ApiClient::register(self, account).await?)
    }

    async fn current_user(&self) -> PortResult<Account> {
        Ok(ApiClient::current_user(self).await?)
    }

    fn logout(&self) -> PortResult<()> {
        Ok(ApiClient::logout(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryTokenStore;
    use medisearch_core::domain::CitationFormat;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> (ApiClient, Arc<MemoryTokenStore>) {
        let tokens = Arc::new(MemoryTokenStore::new());
        let client = ApiClient::new(Client::new(), &server.uri(), tokens.clone()).unwrap();
        (client, tokens)
    }

    fn account_json() -> Value {
        json!({
            "id": "1",
            "email": "a@b.com",
            "full_name": "Ada Lovelace",
            "created_at": "2024-01-01T00:00:00",
            "is_active": true
        })
    }

    async fn mount_login(server: &MockServer, token: &str) {
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .and(body_json(json!({ "email": "a@b.com", "password": "pw123456" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "access_token": token, "token_type": "bearer" })),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn login_persists_token_for_later_calls() {
        let server = MockServer::start().await;
        mount_login(&server, "tok-123").await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(account_json()))
            .expect(1)
            .mount(&server)
            .await;

        let (client, tokens) = client(&server);
        let token = client
            .login(&Credentials::new("a@b.com", "pw123456"))
            .await
            .unwrap();
        assert_eq!(token.access_token, "tok-123");
        assert_eq!(tokens.load().unwrap().as_deref(), Some("tok-123"));

        let me = client.current_user().await.unwrap();
        assert_eq!(me.id, "1");
        assert_eq!(me.email, "a@b.com");
    }

    #[tokio::test]
    async fn logout_drops_the_authorization_header() {
        let server = MockServer::start().await;
        mount_login(&server, "tok-123").await;
        Mock::given(method("GET"))
            .and(path("/api/v1/history"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": "Missing authorization header"
            })))
            .mount(&server)
            .await;

        let (client, tokens) = client(&server);
        client
            .login(&Credentials::new("a@b.com", "pw123456"))
            .await
            .unwrap();
        client.logout().unwrap();
        assert_eq!(tokens.load().unwrap(), None);

        let err = client.history(DEFAULT_HISTORY_LIMIT, 0).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "Missing authorization header");

        let requests = server.received_requests().await.unwrap();
        let last = requests.last().unwrap();
        assert!(last.headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn failure_message_comes_from_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/register"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "detail": "Email already registered" })),
            )
            .mount(&server)
            .await;

        let (client, _) = client(&server);
        let err = client
            .register(&NewAccount {
                email: "a@b.com".into(),
                password: "pw123456".into(),
                full_name: "Ada".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Api { status: 400, .. }));
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[tokio::test]
    async fn unparsable_failure_body_gets_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/medical/health"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let (client, _) = client(&server);
        let err = client.check_health().await.unwrap_err();
        assert_eq!(err.to_string(), "API Error: 502");
    }

    #[test]
    fn structured_details_are_rendered_as_json() {
        let body = br#"{"detail":[{"loc":["body","query"],"msg":"too short"}]}"#;
        assert_eq!(
            error_message(422, body),
            r#"[{"loc":["body","query"],"msg":"too short"}]"#
        );
        assert_eq!(error_message(500, br#"{"error":"x"}"#), "API Error: 500");
        assert_eq!(error_message(500, br#"{"detail":""}"#), "API Error: 500");
    }

    #[tokio::test]
    async fn history_sends_paging_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/history"))
            .and(query_param("limit", "5"))
            .and(query_param("skip", "15"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 1,
                "searches": [{
                    "id": "s1",
                    "user_id": "1",
                    "query": "aspirin",
                    "answer": "Yes.",
                    "sources_count": 3,
                    "overall_confidence": 0.8,
                    "created_at": "2024-01-01T00:00:00"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _) = client(&server);
        let page = client.history(5, 15).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.searches[0].query, "aspirin");
    }

    #[tokio::test]
    async fn delete_accepts_any_json_ack() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/history/42"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "message": "Search deleted successfully" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (client, _) = client(&server);
        client.delete_search("42").await.unwrap();
    }

    #[tokio::test]
    async fn citations_serialize_format_in_lowercase() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/citations"))
            .and(body_json(json!({ "paper_ids": ["s1:p1"], "format": "apa" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "format": "apa", "citations": "Doe, J. (2020)." })),
            )
            .mount(&server)
            .await;

        let (client, _) = client(&server);
        let response = client
            .export_citations(&CitationRequest {
                paper_ids: vec!["s1:p1".into()],
                format: CitationFormat::Apa,
            })
            .await
            .unwrap();
        assert_eq!(response.citations, "Doe, J. (2020).");
    }

    #[tokio::test]
    async fn search_accepts_scalar_source_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/medical/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": "statin myopathy",
                "answer": "**Rare** but documented.",
                "sources": [{
                    "paper_id": "pmid-1",
                    "title": "Statin myopathy",
                    "relevance_score": 0.91,
                    "chunk_text": "...",
                    "source": "pubmed",
                    "metadata": { "mesh_terms": "Statins; Myopathy", "publication_date": 2019 }
                }],
                "validation": {
                    "clinical_expert": {
                        "confidence": 0.8, "reasoning": "ok", "flags": [],
                        "clinical_relevance": 0.7, "safety_concerns": []
                    },
                    "statistical_validator": {
                        "confidence": 0.6, "reasoning": "ok", "flags": [],
                        "statistical_score": 0.5, "methodology_notes": ""
                    },
                    "contradiction_detector": {
                        "confidence": 0.9, "reasoning": "ok", "flags": [],
                        "contradiction_level": "low", "conflicting_sources": []
                    },
                    "overall_confidence": 0.77
                },
                "processing_time_ms": 1234.5,
                "timestamp": "2025-01-01T00:00:00"
            })))
            .mount(&server)
            .await;

        let (client, _) = client(&server);
        let result = client
            .search(&SearchRequest::new("statin myopathy"))
            .await
            .unwrap();

        let metadata = &result.sources[0].metadata;
        assert_eq!(metadata["mesh_terms"], "Statins; Myopathy");
        assert_eq!(metadata["publication_date"], 2019);
    }

    #[tokio::test]
    async fn undecodable_success_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7 })))
            .mount(&server)
            .await;

        let (client, _) = client(&server);
        let err = client.current_user().await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
        assert!(matches!(PortError::from(err), PortError::Unexpected(_)));
    }
}
