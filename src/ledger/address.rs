//! Account addresses for the token ledger
//!
//! Addresses are 20-byte identifiers rendered as `0x` + 40 hex characters.
//! The all-zero address is a sentinel meaning "no account" and is never a
//! valid transfer target.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing an address
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address must start with 0x")]
    MissingPrefix,
    #[error("Address must be 20 bytes (40 hex characters)")]
    InvalidLength,
    #[error("Address contains non-hex characters")]
    InvalidHex,
}

/// A 20-byte account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// The zero-address sentinel ("no account")
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create an address from raw bytes
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    /// Whether this is the zero-address sentinel
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Get the raw address bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Derive a deterministic address from a human-readable label
    ///
    /// Takes the first 20 bytes of SHA-256 of the label. Intended for demos
    /// and tests, where a memorable name stands in for a real account.
    pub fn derive(label: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(label.as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[..20]);
        Address(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s.strip_prefix("0x").ok_or(AddressError::MissingPrefix)?;

        if hex_part.len() != 40 {
            return Err(AddressError::InvalidLength);
        }

        let decoded = hex::decode(hex_part).map_err(|_| AddressError::InvalidHex)?;
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&decoded);
        Ok(Address(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}
