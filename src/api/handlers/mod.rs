//! REST endpoint handlers organized by resource.

pub mod connection;
pub mod system;
pub mod users;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(connection::routes())
        .merge(users::routes())
}
