//! Connection logging handler.

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;

use crate::api::dto::LogConnectionParams;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ServiceError};

/// `POST /api/connection` — Log a user connection event.
///
/// # Errors
///
/// Returns [`ServiceError::InvalidIpAddress`] if `ipAddress` is not an IPv4
/// or IPv6 address.
#[utoipa::path(
    post,
    path = "/api/connection",
    tag = "Connections",
    summary = "Log a user connection",
    description = "Records that the user connected from the given address at the current time.",
    params(LogConnectionParams),
    responses(
        (status = 200, description = "Connection logged"),
        (status = 400, description = "Invalid IP address", body = String),
        (status = 500, description = "Store unavailable", body = ErrorResponse),
    )
)]
pub async fn log_connection(
    State(state): State<AppState>,
    Query(params): Query<LogConnectionParams>,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .connection_service
        .log_connection(params.user_id, &params.ip_address)
        .await?;
    Ok(StatusCode::OK)
}

/// Connection logging routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/connection", post(log_connection))
}
