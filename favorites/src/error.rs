use civic_crypto::DeriveError;
use civic_store::StoreError;
use civic_types::Identity;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FavoriteError {
    #[error("admin for authority {0} is already initialized")]
    AdminAlreadyInitialized(Identity),

    #[error("admin for authority {0} has not been initialized")]
    AdminNotInitialized(Identity),

    #[error("{caller} is not the registered admin")]
    NotAdmin { caller: Identity },

    #[error("favorite of {0} already exists; updates need an approved request")]
    FavoriteAlreadyExists(Identity),

    #[error("favorite of {0} not found")]
    FavoriteNotFound(Identity),

    #[error("favorite of {0} has no update request")]
    NoUpdateRequest(Identity),

    #[error("favorite of {0} has no approved update request")]
    UpdateNotApproved(Identity),

    #[error("values do not match the update approved for {0}")]
    PendingMismatch(Identity),

    #[error("{field} is {len} bytes, limit is {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("address derivation failed: {0}")]
    Derive(#[from] DeriveError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
