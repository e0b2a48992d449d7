//! services/gateway/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification of the proxy routes.

use crate::web::{auth, compare, history, search};
use medisearch_core::domain::{DateRange, SearchFilters, SourceType, StudyType};
use medisearch_core::validation::{
    CitationPayload, ComparePayload, LoginPayload, RegisterPayload, SearchPayload,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        auth::me_handler,
        search::search_handler,
        search::health_handler,
        history::list_history_handler,
        history::search_detail_handler,
        history::delete_search_handler,
        compare::compare_handler,
        compare::citations_handler,
    ),
    components(
        schemas(
            LoginPayload,
            RegisterPayload,
            SearchPayload,
            ComparePayload,
            CitationPayload,
            SearchFilters,
            DateRange,
            SourceType,
            StudyType
        )
    ),
    tags(
        (name = "MediSearch Gateway", description = "Validating proxy in front of the medical search backend.")
    )
)]
pub struct ApiDoc;
