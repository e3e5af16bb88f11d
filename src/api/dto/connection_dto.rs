//! Connection DTOs: log-connection input and last-connection output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ConnectionEvent;

/// Query parameters for `POST /api/connection`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct LogConnectionParams {
    /// User ID.
    pub user_id: i64,
    /// User's IP address (IPv4 or IPv6).
    pub ip_address: String,
}

/// Response body for `GET /api/users/{userId}/last-connection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LastConnectionDto {
    /// Address of the most recent connection.
    pub ip_address: String,
    /// When the most recent connection was logged (UTC).
    pub timestamp: DateTime<Utc>,
}

impl From<ConnectionEvent> for LastConnectionDto {
    fn from(event: ConnectionEvent) -> Self {
        Self {
            ip_address: event.ip_address,
            timestamp: event.timestamp,
        }
    }
}
