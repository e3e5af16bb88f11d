//! Domain layer: the connection event entity and its value types.
//!
//! A connection event is one recorded instance of a user connecting from an
//! IP address at a point in time. Events are append-only.

pub mod connection;
pub mod ip_address;

pub use connection::{ConnectionEvent, NewConnection, UserId};
pub use ip_address::{IpAddressText, MAX_IP_ADDRESS_LEN};
