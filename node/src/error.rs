use std::fmt;

use civic_favorites::FavoriteError;
use civic_polls::PollError;
use civic_store::StoreError;
use civic_store_lmdb::LmdbError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("poll error: {0}")]
    Polls(#[from] PollError),

    #[error("favorite error: {0}")]
    Favorites(#[from] FavoriteError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] LmdbError),

    #[error("invalid instruction: {0}")]
    InvalidInstruction(String),

    #[error("the all-zero identity is reserved and cannot be used as {0}")]
    ReservedIdentity(&'static str),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("config error: {0}")]
    Config(String),
}

/// Stable, caller-visible classification of a failed operation.
///
/// Nothing is retried inside the node; callers decide what to do per kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    AlreadyExists,
    AlreadyVoted,
    NotFound,
    Unauthorized,
    NoPendingRequest,
    NoApprovedRequest,
    InvalidArgument,
    Overflow,
    PollClosed,
    Storage,
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::AlreadyExists => "AlreadyExists",
            ErrorKind::AlreadyVoted => "AlreadyVoted",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::NoPendingRequest => "NoPendingRequest",
            ErrorKind::NoApprovedRequest => "NoApprovedRequest",
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::Overflow => "Overflow",
            ErrorKind::PollClosed => "PollClosed",
            ErrorKind::Storage => "Storage",
            ErrorKind::Config => "Config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl NodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NodeError::Polls(e) => poll_kind(e),
            NodeError::Favorites(e) => favorite_kind(e),
            NodeError::Store(e) => store_kind(e),
            NodeError::Lmdb(_) | NodeError::Encoding(_) => ErrorKind::Storage,
            NodeError::InvalidInstruction(_) | NodeError::ReservedIdentity(_) => {
                ErrorKind::InvalidArgument
            }
            NodeError::Config(_) => ErrorKind::Config,
        }
    }
}

fn poll_kind(e: &PollError) -> ErrorKind {
    match e {
        PollError::PollAlreadyExists(_) | PollError::CandidateAlreadyExists { .. } => {
            ErrorKind::AlreadyExists
        }
        PollError::AlreadyVoted { .. } => ErrorKind::AlreadyVoted,
        PollError::PollNotFound(_) | PollError::CandidateNotFound { .. } => ErrorKind::NotFound,
        PollError::NotCreator { .. } => ErrorKind::Unauthorized,
        PollError::PollNotStarted { .. } | PollError::PollEnded { .. } | PollError::PollFinished(_) => {
            ErrorKind::PollClosed
        }
        PollError::FieldTooLong { .. } | PollError::InvalidWindow { .. } | PollError::Derive(_) => {
            ErrorKind::InvalidArgument
        }
        PollError::Overflow(_) => ErrorKind::Overflow,
        PollError::Store(e) => store_kind(e),
    }
}

fn favorite_kind(e: &FavoriteError) -> ErrorKind {
    match e {
        FavoriteError::AdminAlreadyInitialized(_) | FavoriteError::FavoriteAlreadyExists(_) => {
            ErrorKind::AlreadyExists
        }
        FavoriteError::AdminNotInitialized(_) | FavoriteError::FavoriteNotFound(_) => {
            ErrorKind::NotFound
        }
        FavoriteError::NotAdmin { .. } => ErrorKind::Unauthorized,
        FavoriteError::NoUpdateRequest(_) => ErrorKind::NoPendingRequest,
        FavoriteError::UpdateNotApproved(_) => ErrorKind::NoApprovedRequest,
        FavoriteError::PendingMismatch(_)
        | FavoriteError::FieldTooLong { .. }
        | FavoriteError::Derive(_) => ErrorKind::InvalidArgument,
        FavoriteError::Store(e) => store_kind(e),
    }
}

fn store_kind(e: &StoreError) -> ErrorKind {
    match e {
        StoreError::AlreadyExists(_) => ErrorKind::AlreadyExists,
        StoreError::NotFound(_) => ErrorKind::NotFound,
        StoreError::Unauthorized { .. } => ErrorKind::Unauthorized,
        StoreError::ConstraintViolation(_) => ErrorKind::InvalidArgument,
        StoreError::KindMismatch { .. }
        | StoreError::Backend(_)
        | StoreError::Serialization(_)
        | StoreError::Corruption(_) => ErrorKind::Storage,
    }
}
