//! Service layer: boundary validation and delegation to storage.
//!
//! [`ConnectionService`] validates request input, stamps write times and
//! forwards each operation to the configured
//! [`crate::persistence::ConnectionStore`].

pub mod connection_service;

pub use connection_service::ConnectionService;
