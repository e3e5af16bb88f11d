//! Per-user lookup handlers: users by IP prefix, IPs by user, last connection.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::LastConnectionDto;
use crate::app_state::AppState;
use crate::domain::UserId;
use crate::error::{ErrorResponse, ServiceError};

/// `GET /api/users/by-ip/{partialIp}` — Users whose address starts with a prefix.
///
/// # Errors
///
/// Returns [`ServiceError`] if the store fails.
#[utoipa::path(
    get,
    path = "/api/users/by-ip/{partialIp}",
    tag = "Users",
    summary = "Find users by IP prefix",
    description = "Returns the distinct IDs of users with at least one connection from an address starting with the given text.",
    params(
        ("partialIp" = String, Path, description = "Leading part of an IP address"),
    ),
    responses(
        (status = 200, description = "Distinct user IDs", body = Vec<i64>),
        (status = 500, description = "Store unavailable", body = ErrorResponse),
    )
)]
pub async fn find_users_by_ip(
    State(state): State<AppState>,
    Path(partial_ip): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let users = state
        .connection_service
        .users_by_ip_prefix(&partial_ip)
        .await?;
    Ok(Json(users))
}

/// `GET /api/users/{userId}/ips` — Distinct addresses of a user.
///
/// # Errors
///
/// Returns [`ServiceError`] if the store fails.
#[utoipa::path(
    get,
    path = "/api/users/{userId}/ips",
    tag = "Users",
    summary = "List a user's IP addresses",
    description = "Returns every distinct address the user has connected from.",
    params(
        ("userId" = i64, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Distinct IP addresses", body = Vec<String>),
        (status = 500, description = "Store unavailable", body = ErrorResponse),
    )
)]
pub async fn get_user_ips(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<impl IntoResponse, ServiceError> {
    let ips = state.connection_service.user_ips(user_id).await?;
    Ok(Json(ips))
}

/// `GET /api/users/{userId}/last-connection` — Most recent connection of a user.
///
/// Responds with JSON `null` when the user has never connected.
///
/// # Errors
///
/// Returns [`ServiceError`] if the store fails.
#[utoipa::path(
    get,
    path = "/api/users/{userId}/last-connection",
    tag = "Users",
    summary = "Get a user's last connection",
    description = "Returns the address and time of the user's most recent connection, or null if there is none.",
    params(
        ("userId" = i64, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Last connection, or null", body = LastConnectionDto),
        (status = 500, description = "Store unavailable", body = ErrorResponse),
    )
)]
pub async fn get_last_connection(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<impl IntoResponse, ServiceError> {
    let last = state
        .connection_service
        .last_connection(user_id)
        .await?
        .map(LastConnectionDto::from);
    Ok(Json(last))
}

/// User lookup routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/by-ip/{partialIp}", get(find_users_by_ip))
        .route("/users/{userId}/ips", get(get_user_ips))
        .route("/users/{userId}/last-connection", get(get_last_connection))
}
