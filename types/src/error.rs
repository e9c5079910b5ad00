//! Parse errors for the textual forms of identities, addresses and namespaces.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid hex character {0:?}")]
    InvalidHex(char),

    #[error("namespace label is {len} bytes, limit is {max}")]
    LabelTooLong { len: usize, max: usize },

    #[error("invalid namespace label: {0}")]
    InvalidLabel(&'static str),
}
