//! LMDB environment setup and schema versioning.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::{LmdbError, LmdbRecordStore};

/// The schema version that the current code writes.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";
const RECORDS_DB: &str = "records";
const META_DB: &str = "meta";

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) records_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    ///
    /// Creates the directory if needed, creates the databases on first open and
    /// stamps or checks the schema version. A database written by a newer schema
    /// is refused.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per path by this process and
        // never through a second handle.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let records_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(RECORDS_DB))?;
        let meta_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(META_DB))?;

        let stored = match meta_db.get(&wtxn, SCHEMA_VERSION_KEY)? {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                    LmdbError::Serialization("schema_version has unexpected byte length".into())
                })?;
                Some(u32::from_le_bytes(arr))
            }
            None => None,
        };
        match stored {
            Some(found) if found > CURRENT_SCHEMA_VERSION => {
                return Err(LmdbError::SchemaTooNew {
                    found,
                    supported: CURRENT_SCHEMA_VERSION,
                });
            }
            Some(found) => {
                tracing::info!(version = found, path = %path.display(), "opened record database");
            }
            None => {
                meta_db.put(
                    &mut wtxn,
                    SCHEMA_VERSION_KEY,
                    &CURRENT_SCHEMA_VERSION.to_le_bytes(),
                )?;
                tracing::info!(
                    version = CURRENT_SCHEMA_VERSION,
                    path = %path.display(),
                    "created record database"
                );
            }
        }
        wtxn.commit()?;

        Ok(Self {
            env: Arc::new(env),
            records_db,
            meta_db,
        })
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    /// The stored schema version (0 if never stamped).
    pub fn schema_version(&self) -> Result<u32, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let version = self
            .meta_db
            .get(&rtxn, SCHEMA_VERSION_KEY)?
            .and_then(|b| <[u8; 4]>::try_from(b).ok())
            .map(u32::from_le_bytes)
            .unwrap_or(0);
        Ok(version)
    }

    /// Build the record store over this environment.
    pub fn record_store(&self) -> LmdbRecordStore {
        LmdbRecordStore {
            env: Arc::clone(&self.env),
            records_db: self.records_db,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_environment_is_stamped() {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), 4, 10 * 1024 * 1024).expect("open");
        assert_eq!(env.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn reopen_keeps_version() {
        let dir = tempfile::tempdir().expect("temp dir");
        {
            LmdbEnvironment::open(dir.path(), 4, 10 * 1024 * 1024).expect("first open");
        }
        let env = LmdbEnvironment::open(dir.path(), 4, 10 * 1024 * 1024).expect("second open");
        assert_eq!(env.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn newer_schema_is_refused() {
        let dir = tempfile::tempdir().expect("temp dir");
        {
            let env = LmdbEnvironment::open(dir.path(), 4, 10 * 1024 * 1024).expect("open");
            let mut wtxn = env.env().write_txn().unwrap();
            env.meta_db
                .put(
                    &mut wtxn,
                    SCHEMA_VERSION_KEY,
                    &(CURRENT_SCHEMA_VERSION + 1).to_le_bytes(),
                )
                .unwrap();
            wtxn.commit().unwrap();
        }
        let err = LmdbEnvironment::open(dir.path(), 4, 10 * 1024 * 1024)
            .err()
            .expect("should refuse");
        assert!(matches!(err, LmdbError::SchemaTooNew { .. }));
    }
}
