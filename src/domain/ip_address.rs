//! Validated IP address text.
//!
//! [`IpAddressText`] holds the exact string a client supplied, but can only
//! be constructed from text that parses as an IPv4 or IPv6 address. Storage
//! keeps the client's spelling (e.g. `::1` stays `::1`, not `0:0:...:1`).

use std::fmt;
use std::net::IpAddr;

use crate::error::ServiceError;

/// Maximum stored length of an IP address, in characters.
///
/// Fits the longest textual IPv6 form, an IPv4-mapped address with every
/// group spelled out (`ffff:ffff:ffff:ffff:ffff:ffff:255.255.255.255`).
pub const MAX_IP_ADDRESS_LEN: usize = 45;

/// IP address text that has passed boundary validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IpAddressText(String);

impl IpAddressText {
    /// Validates `raw` as dotted-decimal IPv4 or colon-hex IPv6 text.
    ///
    /// Hostnames, out-of-range octets, surrounding whitespace and the empty
    /// string are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidIpAddress`] if `raw` is not an IP
    /// address.
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        raw.parse::<IpAddr>()
            .map(|_| Self(raw.to_owned()))
            .map_err(|_| ServiceError::InvalidIpAddress)
    }

    /// Returns the address text as supplied by the client.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper, returning the address text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for IpAddressText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
