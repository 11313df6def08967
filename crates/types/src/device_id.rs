// Path: crates/types/src/device_id.rs

//! Defines the canonical `DeviceId`, the stable identity of a node in the
//! sync network.
//!
//! A `DeviceId` is an opaque 256-bit value (in practice the hash of the
//! peer's certificate, derived elsewhere). It remains constant for the
//! lifetime of a device and is used both as a map key in consolidated views
//! and, in raw byte form, as a fixed-width component of storage keys. The
//! all-zero value is reserved as the `EMPTY` sentinel and never identifies a
//! real device.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors arising when constructing a `DeviceId` from untrusted input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeviceIdError {
    /// The input did not have the fixed identity width.
    #[error("invalid device ID length: {0}")]
    InvalidLength(usize),
    /// The string form was not valid hex.
    #[error("invalid device ID encoding: {0}")]
    InvalidEncoding(String),
}

/// A unique, stable identifier for a device in the sync network, represented
/// as a 32-byte array.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct DeviceId(pub [u8; 32]);

impl DeviceId {
    /// Width of the raw identity in bytes, relied upon by key codecs.
    pub const LENGTH: usize = 32;

    /// The reserved all-zero identity. Never assigned to a real device.
    pub const EMPTY: DeviceId = DeviceId([0u8; 32]);

    /// Whether this is the reserved `EMPTY` sentinel.
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl AsRef<[u8]> for DeviceId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for DeviceId {
    fn from(raw: [u8; 32]) -> Self {
        Self(raw)
    }
}

impl TryFrom<&[u8]> for DeviceId {
    type Error = DeviceIdError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let raw: [u8; 32] = bytes
            .try_into()
            .map_err(|_| DeviceIdError::InvalidLength(bytes.len()))?;
        Ok(Self(raw))
    }
}

impl std::fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DeviceId({})", hex::encode(self.0))
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl std::str::FromStr for DeviceId {
    type Err = DeviceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| DeviceIdError::InvalidEncoding(e.to_string()))?;
        Self::try_from(bytes.as_slice())
    }
}

// Serialized as the hex string form so that views keyed by `DeviceId` map
// directly onto JSON objects in the management API.
impl Serialize for DeviceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for DeviceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
