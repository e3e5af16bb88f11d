//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Parsing goes through a lookup function
//! so it can be exercised without touching the process environment.

use std::net::SocketAddr;

use crate::error::ServiceError;

/// Connection value that selects the in-memory store instead of PostgreSQL.
pub const IN_MEMORY_CONNECTION: &str = "memory";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`ServiceConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8080`).
    pub listen_addr: SocketAddr,

    /// Database target: a `postgres://` URL, a keyword/value connection
    /// string, or [`IN_MEMORY_CONNECTION`].
    pub database_connection: String,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Minimum idle connections in the pool.
    pub database_min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// Whether to apply schema migrations at startup.
    pub run_migrations: bool,

    /// Log output format.
    pub log_format: LogFormat,
}

impl ServiceConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// See [`ServiceConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ServiceError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// `DB_CONNECTION` is required; `DATABASE_URL` is accepted as a
    /// fallback. Everything else falls back to a default when missing or
    /// unparseable.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] if no database connection is
    /// configured or `LISTEN_ADDR` is not a socket address.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr = lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let listen_addr: SocketAddr = listen_addr
            .parse()
            .map_err(|_| ServiceError::Validation(format!("invalid LISTEN_ADDR: {listen_addr}")))?;

        let database_connection = lookup("DB_CONNECTION")
            .or_else(|| lookup("DATABASE_URL"))
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ServiceError::Validation("DB_CONNECTION is not set".to_string()))?;

        let log_format = match lookup("LOG_FORMAT").map(|v| v.to_ascii_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            database_connection,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10),
            database_min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 1),
            database_connect_timeout_secs: parse_or(&lookup, "DATABASE_CONNECT_TIMEOUT_SECS", 5),
            run_migrations: parse_bool_or(&lookup, "RUN_MIGRATIONS", true),
            log_format,
        })
    }

    /// Returns `true` if the in-memory store was requested.
    #[must_use]
    pub fn uses_in_memory_store(&self) -> bool {
        self.database_connection.trim() == IN_MEMORY_CONNECTION
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Parses `key` as a boolean. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<ServiceConfig, ServiceError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let Ok(config) = load(&[("DB_CONNECTION", "postgres://localhost/uc")]) else {
            panic!("config should load");
        };
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.database_min_connections, 1);
        assert_eq!(config.database_connect_timeout_secs, 5);
        assert!(config.run_migrations);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(!config.uses_in_memory_store());
    }

    #[test]
    fn missing_connection_is_an_error() {
        assert!(matches!(load(&[]), Err(ServiceError::Validation(_))));
        assert!(load(&[("DB_CONNECTION", "  ")]).is_err());
    }

    #[test]
    fn database_url_is_a_fallback() {
        let Ok(config) = load(&[("DATABASE_URL", "postgres://fallback/uc")]) else {
            panic!("config should load");
        };
        assert_eq!(config.database_connection, "postgres://fallback/uc");
    }

    #[test]
    fn overrides_are_read() {
        let Ok(config) = load(&[
            ("DB_CONNECTION", "memory"),
            ("LISTEN_ADDR", "127.0.0.1:9000"),
            ("DATABASE_MAX_CONNECTIONS", "32"),
            ("RUN_MIGRATIONS", "FALSE"),
            ("LOG_FORMAT", "Json"),
        ]) else {
            panic!("config should load");
        };
        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(config.database_max_connections, 32);
        assert!(!config.run_migrations);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.uses_in_memory_store());
    }

    #[test]
    fn garbage_numbers_fall_back() {
        let Ok(config) = load(&[
            ("DB_CONNECTION", "memory"),
            ("DATABASE_MAX_CONNECTIONS", "lots"),
        ]) else {
            panic!("config should load");
        };
        assert_eq!(config.database_max_connections, 10);
    }

    #[test]
    fn bad_listen_addr_is_an_error() {
        assert!(load(&[("DB_CONNECTION", "memory"), ("LISTEN_ADDR", "nowhere")]).is_err());
    }
}
