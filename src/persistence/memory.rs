//! In-memory connection store.
//!
//! Mirrors the PostgreSQL store's semantics (column length limit, distinct
//! results, latest-by-timestamp with highest-id tie-break) without a
//! database. Used by tests and for local runs with `DB_CONNECTION=memory`.

use std::collections::BTreeSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ConnectionStore;
use crate::domain::{ConnectionEvent, MAX_IP_ADDRESS_LEN, NewConnection, UserId};
use crate::error::ServiceError;

#[derive(Debug, Default)]
struct Table {
    rows: Vec<ConnectionEvent>,
    next_id: i64,
}

/// Connection store holding all rows in process memory.
#[derive(Debug, Default)]
pub struct InMemoryConnectionStore {
    table: RwLock<Table>,
}

impl InMemoryConnectionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored rows, duplicates included.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Returns `true` if nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.rows.is_empty()
    }
}

#[async_trait]
impl ConnectionStore for InMemoryConnectionStore {
    async fn insert(&self, event: NewConnection) -> Result<ConnectionEvent, ServiceError> {
        if event.ip_address.chars().count() > MAX_IP_ADDRESS_LEN {
            return Err(ServiceError::Validation(format!(
                "ip_address exceeds {MAX_IP_ADDRESS_LEN} characters"
            )));
        }

        let mut table = self.table.write().await;
        table.next_id += 1;
        let stored = event.into_event(table.next_id);
        table.rows.push(stored.clone());
        Ok(stored)
    }

    async fn find_user_ids_by_ip_prefix(&self, prefix: &str) -> Result<Vec<UserId>, ServiceError> {
        let table = self.table.read().await;
        let ids: BTreeSet<UserId> = table
            .rows
            .iter()
            .filter(|row| row.ip_address.starts_with(prefix))
            .map(|row| row.user_id)
            .collect();
        Ok(ids.into_iter().collect())
    }

    async fn find_ips_by_user(&self, user_id: UserId) -> Result<Vec<String>, ServiceError> {
        let table = self.table.read().await;
        let ips: BTreeSet<&str> = table
            .rows
            .iter()
            .filter(|row| row.user_id == user_id)
            .map(|row| row.ip_address.as_str())
            .collect();
        Ok(ips.into_iter().map(str::to_owned).collect())
    }

    async fn find_latest_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<ConnectionEvent>, ServiceError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|row| row.user_id == user_id)
            .max_by_key(|row| (row.timestamp, row.id))
            .cloned())
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::domain::IpAddressText;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        let Some(ts) = Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single() else {
            panic!("valid date");
        };
        ts
    }

    fn event(user_id: UserId, ip: &str, timestamp: DateTime<Utc>) -> NewConnection {
        let Ok(ip) = IpAddressText::parse(ip) else {
            panic!("valid ip {ip}");
        };
        NewConnection::new(user_id, ip, timestamp)
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = InMemoryConnectionStore::new();
        let first = assert_ok!(store.insert(event(1, "127.0.0.1", Utc::now())).await);
        let second = assert_ok!(store.insert(event(1, "127.0.0.1", Utc::now())).await);
        assert!(second.id > first.id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn insert_rejects_overlong_address() {
        let store = InMemoryConnectionStore::new();
        let overlong = NewConnection {
            user_id: 1,
            ip_address: "1".repeat(MAX_IP_ADDRESS_LEN + 1),
            timestamp: Utc::now(),
        };
        let err = assert_err!(store.insert(overlong).await);
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn user_ips_are_distinct() {
        let store = InMemoryConnectionStore::new();
        for ip in ["127.0.0.1", "31.214.157.141", "127.0.0.1"] {
            assert_ok!(store.insert(event(100_001, ip, Utc::now())).await);
        }

        let ips = assert_ok!(store.find_ips_by_user(100_001).await);
        assert_eq!(ips, vec!["127.0.0.1".to_string(), "31.214.157.141".to_string()]);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn prefix_match_is_literal_prefix() {
        let store = InMemoryConnectionStore::new();
        assert_ok!(store.insert(event(100_001, "31.214.157.141", Utc::now())).await);
        assert_ok!(store.insert(event(1_234_567, "31.214.1.1", Utc::now())).await);
        assert_ok!(store.insert(event(9_876_543, "62.4.36.194", Utc::now())).await);
        // Contains "31.214" but does not start with it.
        assert_ok!(store.insert(event(5_555_555, "131.214.0.1", Utc::now())).await);

        let users = assert_ok!(store.find_user_ids_by_ip_prefix("31.214").await);
        assert_eq!(users, vec![100_001, 1_234_567]);
    }

    #[tokio::test]
    async fn prefix_match_is_case_sensitive() {
        let store = InMemoryConnectionStore::new();
        assert_ok!(store.insert(event(21, "2001:DB8:ABCD::1", Utc::now())).await);

        let lower = assert_ok!(store.find_user_ids_by_ip_prefix("2001:db8:abcd").await);
        assert!(lower.is_empty());

        let upper = assert_ok!(store.find_user_ids_by_ip_prefix("2001:DB8:ABCD").await);
        assert_eq!(upper, vec![21]);
    }

    #[tokio::test]
    async fn prefix_pattern_characters_are_literal() {
        let store = InMemoryConnectionStore::new();
        assert_ok!(store.insert(event(22, "10.0.0.1", Utc::now())).await);

        for prefix in ["%", "10.%", "1_.", "_"] {
            let users = assert_ok!(store.find_user_ids_by_ip_prefix(prefix).await);
            assert!(users.is_empty(), "{prefix:?} should match nothing");
        }
    }

    #[tokio::test]
    async fn prefix_match_collapses_users() {
        let store = InMemoryConnectionStore::new();
        assert_ok!(store.insert(event(7, "10.0.0.1", Utc::now())).await);
        assert_ok!(store.insert(event(7, "10.0.0.2", Utc::now())).await);

        let users = assert_ok!(store.find_user_ids_by_ip_prefix("10.").await);
        assert_eq!(users, vec![7]);
    }

    #[tokio::test]
    async fn latest_picks_max_timestamp() {
        let store = InMemoryConnectionStore::new();
        assert_ok!(store.insert(event(100_001, "127.0.0.1", at(2024, 5, 1))).await);
        assert_ok!(store.insert(event(100_001, "31.214.157.141", at(2024, 5, 10))).await);
        assert_ok!(store.insert(event(100_001, "62.4.36.194", at(2024, 5, 5))).await);

        let latest = assert_ok!(store.find_latest_by_user(100_001).await);
        let Some(latest) = latest else {
            panic!("expected a record");
        };
        assert_eq!(latest.ip_address, "31.214.157.141");
        assert_eq!(latest.timestamp, at(2024, 5, 10));
    }

    #[tokio::test]
    async fn latest_ties_resolve_to_highest_id() {
        let store = InMemoryConnectionStore::new();
        let ts = at(2024, 5, 10);
        assert_ok!(store.insert(event(3, "10.0.0.1", ts)).await);
        let newer = assert_ok!(store.insert(event(3, "10.0.0.2", ts)).await);

        let latest = assert_ok!(store.find_latest_by_user(3).await);
        assert_eq!(latest.map(|e| e.id), Some(newer.id));
    }

    #[tokio::test]
    async fn latest_for_unknown_user_is_none() {
        let store = InMemoryConnectionStore::new();
        assert_ok!(store.insert(event(1, "10.0.0.1", Utc::now())).await);

        let latest = assert_ok!(store.find_latest_by_user(2).await);
        assert!(latest.is_none());
    }
}
