//! Persistence layer: durable storage of connection events.
//!
//! [`ConnectionStore`] is the seam between the request path and storage.
//! [`PostgresConnectionStore`] is the production implementation backed by
//! `sqlx::PgPool`; [`InMemoryConnectionStore`] has identical semantics and
//! backs tests and database-less local runs.

pub mod connection_string;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{ConnectionEvent, NewConnection, UserId};
use crate::error::ServiceError;

pub use connection_string::parse_connect_options;
pub use memory::InMemoryConnectionStore;
pub use postgres::PostgresConnectionStore;

/// Append-only store of connection events.
///
/// Result lists carry set semantics (duplicates collapsed). Callers must not
/// rely on their order, though both implementations return ascending order.
#[async_trait]
pub trait ConnectionStore: Send + Sync + std::fmt::Debug {
    /// Appends one event and returns it with its assigned `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] if the IP address exceeds
    /// [`crate::domain::MAX_IP_ADDRESS_LEN`] characters, or
    /// [`ServiceError::StoreUnavailable`] on storage failure.
    async fn insert(&self, event: NewConnection) -> Result<ConnectionEvent, ServiceError>;

    /// Distinct user IDs with at least one IP address starting with
    /// `prefix`. The match is a case-sensitive literal prefix; `%` and `_`
    /// carry no pattern meaning.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::StoreUnavailable`] on storage failure.
    async fn find_user_ids_by_ip_prefix(&self, prefix: &str) -> Result<Vec<UserId>, ServiceError>;

    /// Distinct IP addresses recorded for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::StoreUnavailable`] on storage failure.
    async fn find_ips_by_user(&self, user_id: UserId) -> Result<Vec<String>, ServiceError>;

    /// The event with the latest timestamp for `user_id`, or `None` if the
    /// user has no events. Equal timestamps resolve to the highest `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::StoreUnavailable`] on storage failure.
    async fn find_latest_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<ConnectionEvent>, ServiceError>;

    /// Checks that the store can serve queries.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::StoreUnavailable`] if it cannot.
    async fn ping(&self) -> Result<(), ServiceError>;
}
