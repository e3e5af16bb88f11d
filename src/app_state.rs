//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::ConnectionService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection service for all request logic.
    pub connection_service: Arc<ConnectionService>,
}
