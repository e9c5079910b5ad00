//! LMDB storage backend for the civic record ledger.
//!
//! Implements [`civic_store::RecordStore`] using the `heed` LMDB bindings. Every
//! record lives in one `records` database keyed by its 32-byte address; a `meta`
//! database holds the schema version.
//!
//! Each [`RecordStore::transaction`](civic_store::RecordStore::transaction) maps to
//! exactly one LMDB write transaction. LMDB admits one writer at a time, which is
//! what serialises operations on the same address.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod record_store;

pub use environment::{LmdbEnvironment, CURRENT_SCHEMA_VERSION};
pub use error::LmdbError;
pub use integrity::{check_integrity, IntegrityReport};
pub use record_store::LmdbRecordStore;
