pub mod auth;
pub mod compare;
pub mod extractors;
pub mod history;
pub mod proxy;
pub mod rest;
pub mod search;
pub mod state;


use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use self::rest::ApiDoc;
use self::state::AppState;

/// The proxy routes alone, without middleware.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/auth/register", post(auth::register_handler))
        .route("/api/v1/auth/login", post(auth::login_handler))
        .route("/api/v1/auth/me", get(auth::me_handler))
        .route("/api/v1/medical/search", post(search::search_handler))
        .route("/api/v1/medical/health", get(search::health_handler))
        .route("/api/v1/history", get(history::list_history_handler))
        .route("/api/v1/history/", get(history::list_history_handler))
        .route(
            "/api/v1/history/{search_id}",
            get(history::search_detail_handler).delete(history::delete_search_handler),
        )
        .route("/api/v1/compare", post(compare::compare_handler))
        .route("/api/v1/compare/", post(compare::compare_handler))
        .route("/api/v1/citations", post(compare::citations_handler))
        .route("/api/v1/citations/", post(compare::citations_handler))
        .with_state(state)
}

/// The full application: proxy routes, CORS for the configured frontend origin,
/// request tracing and the Swagger UI.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.config.allowed_origin.clone())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    Router::new()
        .merge(router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
