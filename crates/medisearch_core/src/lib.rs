pub mod domain;
pub mod ports;
pub mod session;
pub mod validation;

pub use domain::{
    Account, CitationFormat, CitationRequest, CitationResponse, CompareRequest, CompareResponse,
    Credentials, HealthCheck, HealthStatus, HistoryItem, HistoryPage, NewAccount,
    SavedSearch, SearchFilters, SearchRequest, SearchResult, Token,
};
pub use ports::{
    BackendService, ForwardMethod, ForwardRequest, Forwarded, IdentityService, PortError,
    PortResult, TokenStore, TOKEN_KEY,
};
pub use session::{AnonymousCause, SessionContext, SessionError, SessionState};
pub use validation::Rejection;
