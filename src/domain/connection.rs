//! The connection event entity.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::IpAddressText;

/// Identifier of a connecting user. Many events share one user.
pub type UserId = i64;

/// A stored connection event (one row of `user_connections`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionEvent {
    /// Surrogate key assigned by the store.
    pub id: i64,
    /// User that connected.
    pub user_id: UserId,
    /// Source address, as supplied by the client.
    pub ip_address: String,
    /// When the connection was recorded (UTC).
    pub timestamp: DateTime<Utc>,
}

/// A connection event that has not been stored yet.
///
/// Built from already-validated input; the store only enforces the column
/// length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConnection {
    /// User that connected.
    pub user_id: UserId,
    /// Source address text.
    pub ip_address: String,
    /// Write time.
    pub timestamp: DateTime<Utc>,
}

impl NewConnection {
    /// Creates an event for `user_id` connecting from `ip` at `timestamp`.
    #[must_use]
    pub fn new(user_id: UserId, ip: IpAddressText, timestamp: DateTime<Utc>) -> Self {
        Self {
            user_id,
            ip_address: ip.into_inner(),
            timestamp,
        }
    }

    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn now(user_id: UserId, ip: IpAddressText) -> Self {
        Self::new(user_id, ip, Utc::now())
    }

    /// Attaches the store-assigned `id`.
    #[must_use]
    pub fn into_event(self, id: i64) -> ConnectionEvent {
        ConnectionEvent {
            id,
            user_id: self.user_id,
            ip_address: self.ip_address,
            timestamp: self.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_event_keeps_fields() {
        let Ok(ip) = IpAddressText::parse("10.0.0.1") else {
            unreachable!("valid address");
        };
        let new = NewConnection::now(42, ip);
        let ts = new.timestamp;

        let event = new.into_event(7);
        assert_eq!(event.id, 7);
        assert_eq!(event.user_id, 42);
        assert_eq!(event.ip_address, "10.0.0.1");
        assert_eq!(event.timestamp, ts);
    }

    #[test]
    fn serializes_camel_case() {
        let event = ConnectionEvent {
            id: 1,
            user_id: 100_001,
            ip_address: "127.0.0.1".into(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(json["userId"], 100_001);
        assert_eq!(json["ipAddress"], "127.0.0.1");
    }
}
