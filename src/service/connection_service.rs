//! Connection service: validates input and delegates to the store.

use std::sync::Arc;

use crate::domain::{ConnectionEvent, IpAddressText, NewConnection, UserId};
use crate::error::ServiceError;
use crate::persistence::ConnectionStore;

/// Orchestration layer for connection logging and lookups.
///
/// Stateless apart from the shared store handle; every method is a single
/// store round-trip.
#[derive(Debug, Clone)]
pub struct ConnectionService {
    store: Arc<dyn ConnectionStore>,
}

impl ConnectionService {
    /// Creates a service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn ConnectionStore>) -> Self {
        Self { store }
    }

    /// Records that `user_id` connected from `ip_address` now.
    ///
    /// Nothing is stored when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidIpAddress`] if `ip_address` is not an
    /// IPv4 or IPv6 address, or a store error.
    pub async fn log_connection(
        &self,
        user_id: UserId,
        ip_address: &str,
    ) -> Result<ConnectionEvent, ServiceError> {
        let ip = IpAddressText::parse(ip_address)?;
        let event = self.store.insert(NewConnection::now(user_id, ip)).await?;
        tracing::debug!(
            id = event.id,
            user_id = event.user_id,
            ip = %event.ip_address,
            "connection logged"
        );
        Ok(event)
    }

    /// Distinct users that connected from an address starting with
    /// `partial_ip`.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn users_by_ip_prefix(&self, partial_ip: &str) -> Result<Vec<UserId>, ServiceError> {
        self.store.find_user_ids_by_ip_prefix(partial_ip).await
    }

    /// Distinct addresses `user_id` connected from.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn user_ips(&self, user_id: UserId) -> Result<Vec<String>, ServiceError> {
        self.store.find_ips_by_user(user_id).await
    }

    /// Most recent connection of `user_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn last_connection(
        &self,
        user_id: UserId,
    ) -> Result<Option<ConnectionEvent>, ServiceError> {
        self.store.find_latest_by_user(user_id).await
    }

    /// Round-trips to the store.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::StoreUnavailable`] if the store is unreachable.
    pub async fn check_store(&self) -> Result<(), ServiceError> {
        self.store.ping().await
    }
}
