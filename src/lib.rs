//! # user-connection-service
//!
//! HTTP service that records user connection events (user ID, source IP
//! address, timestamp) and answers lookups over them: distinct IPs per user,
//! users by IP prefix, and a user's most recent connection.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── ConnectionService (service/)   IP validation, write timestamp
//!     │
//!     └── ConnectionStore (persistence/)
//!             ├── PostgreSQL (sqlx)
//!             └── in-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
