//! Abstract record store traits for the civic record ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements [`RecordStore`].
//! The domain engines depend only on these traits.
//!
//! A record lives at a derived [`Address`](civic_types::Address) and is created,
//! read, replaced and removed only inside a [`RecordStore::transaction`]. A
//! transaction either commits every write it made or none of them, and two
//! transactions never interleave on the same address.

pub mod error;
pub mod record;
pub mod store;
pub mod txn;

pub use error::StoreError;
pub use record::{Record, RecordKind, StoredRecord};
pub use store::RecordStore;
pub use txn::{RecordTxn, RecordTxnExt};
