//! PostgreSQL implementation of the persistence layer.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::ConnectionStore;
use crate::config::ServiceConfig;
use crate::domain::{ConnectionEvent, MAX_IP_ADDRESS_LEN, NewConnection, UserId};
use crate::error::ServiceError;

/// SQLSTATE for `string_data_right_truncation` (value too long for column).
const STRING_TOO_LONG: &str = "22001";

/// PostgreSQL-backed connection store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresConnectionStore {
    pool: PgPool,
}

impl PostgresConnectionStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized and targeted by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] if the connection string cannot
    /// be parsed, or [`ServiceError::StoreUnavailable`] if the database
    /// cannot be reached.
    pub async fn connect(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let options = super::parse_connect_options(&config.database_connection)?;
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(std::time::Duration::from_secs(
                config.database_connect_timeout_secs,
            ))
            .connect_with(options)
            .await
            .map_err(store_error)?;

        tracing::info!(
            max_connections = config.database_max_connections,
            "connected to postgres"
        );
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations (table and indexes).
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::StoreUnavailable`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), ServiceError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ServiceError::StoreUnavailable(format!("migration failed: {e}")))?;
        tracing::info!("database migrations applied");
        Ok(())
    }
}

#[async_trait]
impl ConnectionStore for PostgresConnectionStore {
    async fn insert(&self, event: NewConnection) -> Result<ConnectionEvent, ServiceError> {
        sqlx::query_as::<_, ConnectionEvent>(
            "INSERT INTO user_connections (user_id, ip_address, \"timestamp\") \
             VALUES ($1, $2, $3) RETURNING id, user_id, ip_address, \"timestamp\"",
        )
        .bind(event.user_id)
        .bind(&event.ip_address)
        .bind(event.timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)
    }

    async fn find_user_ids_by_ip_prefix(&self, prefix: &str) -> Result<Vec<UserId>, ServiceError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT DISTINCT user_id FROM user_connections \
             WHERE ip_address LIKE $1 ESCAPE '\\' ORDER BY user_id",
        )
        .bind(like_prefix_pattern(prefix))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)
    }

    async fn find_ips_by_user(&self, user_id: UserId) -> Result<Vec<String>, ServiceError> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT ip_address FROM user_connections \
             WHERE user_id = $1 ORDER BY ip_address",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)
    }

    async fn find_latest_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<ConnectionEvent>, ServiceError> {
        sqlx::query_as::<_, ConnectionEvent>(
            "SELECT id, user_id, ip_address, \"timestamp\" FROM user_connections \
             WHERE user_id = $1 ORDER BY \"timestamp\" DESC, id DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(store_error)
    }
}

/// Builds a `LIKE` pattern matching values that start with `prefix`
/// literally. Pairs with `ESCAPE '\'`.
fn like_prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Maps a driver error onto the service taxonomy.
fn store_error(err: sqlx::Error) -> ServiceError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(STRING_TOO_LONG) {
            return ServiceError::Validation(format!(
                "ip_address exceeds {MAX_IP_ADDRESS_LEN} characters"
            ));
        }
    }
    ServiceError::StoreUnavailable(err.to_string())
}
