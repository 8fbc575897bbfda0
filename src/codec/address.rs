//! Dotted-quad address conversion

use std::net::Ipv4Addr;

use super::errors::{CodecError, CodecResult};

/// Convert a dotted-quad address to its 32-bit number, most significant
/// octet first.
pub fn address_to_number(address: &str) -> CodecResult<u32> {
    address
        .trim()
        .parse::<Ipv4Addr>()
        .map(u32::from)
        .map_err(|_| CodecError::InvalidAddress(address.to_string()))
}

/// Convert a 32-bit address number back to dotted-quad notation.
pub fn number_to_address(address: u32) -> String {
    Ipv4Addr::from(address).to_string()
}
