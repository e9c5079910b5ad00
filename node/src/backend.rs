//! The record store a node runs on, chosen by configuration.

use civic_nullables::NullRecordStore;
use civic_store::{RecordStore, RecordTxn, StoreError, StoredRecord};
use civic_store_lmdb::integrity::check_data_dir;
use civic_store_lmdb::{check_integrity, LmdbEnvironment, LmdbRecordStore};
use civic_types::Address;
use tracing::{debug, info, warn};

use crate::tracing_spans::open_store_span;
use crate::{BackendKind, NodeConfig, NodeError};

pub enum Backend {
    Memory(NullRecordStore),
    Lmdb(LmdbRecordStore),
}

impl Backend {
    /// Open the backend named by `config`.
    ///
    /// For LMDB this creates or reopens the environment under `data_dir` and,
    /// if `check_integrity` is set, walks every record once. Undecodable records
    /// are logged, not fatal.
    pub fn open(config: &NodeConfig) -> Result<Self, NodeError> {
        let _span = open_store_span(config.backend.as_str()).entered();
        match config.backend {
            BackendKind::Memory => {
                info!("using in-memory record store");
                Ok(Backend::Memory(NullRecordStore::new()))
            }
            BackendKind::Lmdb => {
                if let Err(reason) = check_data_dir(&config.data_dir) {
                    debug!(%reason, "no existing database, creating one");
                }
                let env = LmdbEnvironment::open(&config.data_dir, config.max_dbs, config.map_size)?;
                let store = env.record_store();
                if config.check_integrity {
                    let report = check_integrity(&store)?;
                    if report.is_healthy() {
                        info!(records = report.records_checked, "integrity check passed");
                    } else {
                        for error in &report.errors {
                            warn!(%error, "integrity check");
                        }
                        warn!(
                            records = report.records_checked,
                            errors = report.errors.len(),
                            "integrity check found corrupt records"
                        );
                    }
                }
                Ok(Backend::Lmdb(store))
            }
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Memory(_) => BackendKind::Memory,
            Backend::Lmdb(_) => BackendKind::Lmdb,
        }
    }
}

impl RecordStore for Backend {
    fn transaction<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn RecordTxn) -> Result<R, E>,
        E: From<StoreError>,
    {
        match self {
            Backend::Memory(s) => s.transaction(f),
            Backend::Lmdb(s) => s.transaction(f),
        }
    }

    fn fetch_or_null(&self, address: &Address) -> Result<Option<StoredRecord>, StoreError> {
        match self {
            Backend::Memory(s) => s.fetch_or_null(address),
            Backend::Lmdb(s) => s.fetch_or_null(address),
        }
    }

    fn fetch_many(&self, addresses: &[Address]) -> Result<Vec<Option<StoredRecord>>, StoreError> {
        match self {
            Backend::Memory(s) => s.fetch_many(addresses),
            Backend::Lmdb(s) => s.fetch_many(addresses),
        }
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        match self {
            Backend::Memory(s) => s.record_count(),
            Backend::Lmdb(s) => s.record_count(),
        }
    }
}
