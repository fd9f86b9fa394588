//! Account address codec
//!
//! Accounts are identified by opaque 32-byte values supplied by the host
//! environment. The human readable form is the character `t` followed by
//! the hexadecimal payload. The all-zero address is reserved as the null
//! account and may never hold or move funds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an address string.
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("address must start with 't'")]
    InvalidPrefix,
    #[error("address must be {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("address payload is not valid hexadecimal")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Number of raw bytes contained in an address.
pub const ADDRESS_BYTES: usize = 32;
/// Expected string length of an encoded address (prefix + 64 hex chars).
pub const ADDRESS_STRING_LENGTH: usize = 1 + ADDRESS_BYTES * 2;

/// A 32-byte account identifier, serialised as its string form in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; ADDRESS_BYTES]);

impl Address {
    /// The reserved null account (all zero bytes).
    pub const NULL: Address = Address([0u8; ADDRESS_BYTES]);

    /// Whether this is the reserved null account.
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; ADDRESS_BYTES]
    }

    /// Raw byte access.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }

    /// Encode into the human readable `t`-prefixed hex form.
    pub fn encode(&self) -> String {
        let mut encoded = String::with_capacity(ADDRESS_STRING_LENGTH);
        encoded.push('t');
        encoded.push_str(&hex::encode(self.0));
        encoded
    }

    /// Decode a human readable address string into the raw bytes.
    pub fn decode(address: &str) -> Result<Self, AddressError> {
        if !address.starts_with('t') {
            return Err(AddressError::InvalidPrefix);
        }

        if address.len() != ADDRESS_STRING_LENGTH {
            return Err(AddressError::InvalidLength {
                expected: ADDRESS_STRING_LENGTH,
                actual: address.len(),
            });
        }

        let mut bytes = [0u8; ADDRESS_BYTES];
        hex::decode_to_slice(&address[1..], &mut bytes)?;
        Ok(Address(bytes))
    }
}

impl From<[u8; ADDRESS_BYTES]> for Address {
    fn from(value: [u8; ADDRESS_BYTES]) -> Self {
        Address(value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.encode()
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Address::decode(&value)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::decode(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
