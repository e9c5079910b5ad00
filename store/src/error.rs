use civic_types::{Address, Identity};
use thiserror::Error;

use crate::RecordKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record already exists at {0}")]
    AlreadyExists(Address),

    #[error("record not found at {0}")]
    NotFound(Address),

    #[error("{caller} does not own the record at {address}")]
    Unauthorized { address: Address, caller: Identity },

    #[error("expected a {expected:?} record, found {actual:?}")]
    KindMismatch {
        expected: RecordKind,
        actual: RecordKind,
    },

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("database is corrupted: {0}")]
    Corruption(String),
}

impl From<bincode::Error> for StoreError {
    fn from(e: bincode::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}
