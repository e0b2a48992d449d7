//! services/gateway/src/web/state.rs
//!
//! Defines the state shared by every proxy route.

use crate::config::Config;
use medisearch_core::ports::BackendService;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
/// Holds nothing per-user; each request is handled on its own.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn BackendService>,
    pub config: Arc<Config>,
}
