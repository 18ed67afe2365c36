//! Core identifier types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length in bytes of a content identifier (BLAKE3 output)
pub const CONTENT_ID_LEN: usize = 32;

/// ContentId: deterministic BLAKE3 fingerprint of stored bytes.
///
/// Used as the storage address of blobs and committed directories alike.
/// Identical bytes always produce the same ContentId.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentId([u8; CONTENT_ID_LEN]);

impl ContentId {
    /// Wrap raw digest bytes
    pub const fn from_bytes(bytes: [u8; CONTENT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Compute the identifier of a byte sequence
    pub fn of(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    /// Build a ContentId from a slice, rejecting anything that is not exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, InvalidContentId> {
        let array: [u8; CONTENT_ID_LEN] = bytes
            .try_into()
            .map_err(|_| InvalidContentId::Length(bytes.len()))?;
        Ok(Self(array))
    }

    /// Parse the 64-character hex form
    pub fn from_hex(text: &str) -> Result<Self, InvalidContentId> {
        let bytes = hex::decode(text.trim()).map_err(|e| InvalidContentId::Hex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; CONTENT_ID_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Abbreviated form for log lines
    pub fn short(&self) -> String {
        hex::encode(&self.0[..6])
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.short())
    }
}

impl FromStr for ContentId {
    type Err = InvalidContentId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for ContentId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Reasons a byte or text form cannot be turned into a ContentId
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidContentId {
    #[error("expected {CONTENT_ID_LEN} bytes, got {0}")]
    Length(usize),

    #[error("invalid hex: {0}")]
    Hex(String),
}
