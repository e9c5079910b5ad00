//! The stored record envelope and the typed records that go inside it.

use civic_types::Identity;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Discriminates what a stored record holds, so a poll can never be decoded as
/// a favorite even if a caller hands the wrong address to a typed load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Poll,
    Candidate,
    VoteRecord,
    AdminConfig,
    Favorite,
}

/// A typed record that can be stored at a derived address.
pub trait Record: Serialize + DeserializeOwned {
    const KIND: RecordKind;
}

/// What a backend actually persists at an address.
///
/// `owner` is the identity that created the record and the only one allowed to
/// close it. `data` is the bincode encoding of the typed record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub kind: RecordKind,
    pub owner: Identity,
    pub data: Vec<u8>,
}

impl StoredRecord {
    /// Wrap a typed record.
    pub fn encode<T: Record>(owner: Identity, value: &T) -> Result<Self, StoreError> {
        Ok(Self {
            kind: T::KIND,
            owner,
            data: bincode::serialize(value)?,
        })
    }

    /// Unwrap a typed record, checking the discriminator first.
    pub fn decode<T: Record>(&self) -> Result<T, StoreError> {
        if self.kind != T::KIND {
            return Err(StoreError::KindMismatch {
                expected: T::KIND,
                actual: self.kind,
            });
        }
        Ok(bincode::deserialize(&self.data)?)
    }

    /// Serialise the whole envelope (what backends write to disk).
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        bincode::deserialize(bytes).map_err(|e| StoreError::Corruption(e.to_string()))
    }
}
