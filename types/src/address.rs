//! Derived record addresses and the namespaces they are derived under.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{encoding, ParseError};

/// A 32-byte record address, computed from a namespace and an ordered seed list.
///
/// Addresses are the only keys of the record store. Use `civic_crypto::derive_address`
/// to compute one; this type is just data.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; 32]);

impl Address {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn from_hex(s: &str) -> Result<Self, ParseError> {
        encoding::decode_32(s).map(Self)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

/// The 32-byte namespace a deployment derives its addresses under.
///
/// Plays the role of a program id: identical seeds under two namespaces never
/// collide.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace([u8; 32]);

impl Namespace {
    /// Longest accepted label, in bytes.
    pub const MAX_LABEL_LEN: usize = 32;

    const DEFAULT_LABEL: &'static str = "civic";

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Build a namespace from a short human label, zero-padded to 32 bytes.
    ///
    /// The label must be 1 to 32 bytes with no NUL byte, so distinct labels
    /// always give distinct namespaces.
    pub fn from_label(label: &str) -> Result<Self, ParseError> {
        let src = label.as_bytes();
        if src.is_empty() {
            return Err(ParseError::InvalidLabel("label is empty"));
        }
        if src.len() > Self::MAX_LABEL_LEN {
            return Err(ParseError::LabelTooLong {
                len: src.len(),
                max: Self::MAX_LABEL_LEN,
            });
        }
        if src.contains(&0) {
            return Err(ParseError::InvalidLabel("label contains a NUL byte"));
        }
        Ok(Self::padded(src))
    }

    fn padded(src: &[u8]) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..src.len()].copy_from_slice(src);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::padded(Self::DEFAULT_LABEL.as_bytes())
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Namespace({})", hex::encode(&self.0[..4]))
    }
}
