//! LMDB implementation of RecordStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, RwTxn};

use civic_store::{RecordStore, RecordTxn, StoreError, StoredRecord};
use civic_types::Address;

use crate::LmdbError;

/// Record store backed by the `records` database of an [`LmdbEnvironment`](crate::LmdbEnvironment).
#[derive(Clone)]
pub struct LmdbRecordStore {
    pub(crate) env: Arc<Env>,
    pub(crate) records_db: Database<Bytes, Bytes>,
}

/// A [`RecordTxn`] over an open LMDB write transaction.
struct LmdbTxn<'a, 'env> {
    txn: &'a mut RwTxn<'env>,
    db: Database<Bytes, Bytes>,
}

impl RecordTxn for LmdbTxn<'_, '_> {
    fn get(&self, address: &Address) -> Result<Option<StoredRecord>, StoreError> {
        let val = self
            .db
            .get(&*self.txn, address.as_bytes())
            .map_err(LmdbError::from)?;
        val.map(StoredRecord::from_bytes).transpose()
    }

    fn insert(&mut self, address: &Address, record: StoredRecord) -> Result<(), StoreError> {
        if self.get(address)?.is_some() {
            return Err(StoreError::AlreadyExists(*address));
        }
        self.put(address, &record)
    }

    fn update(&mut self, address: &Address, record: StoredRecord) -> Result<(), StoreError> {
        if self.get(address)?.is_none() {
            return Err(StoreError::NotFound(*address));
        }
        self.put(address, &record)
    }

    fn remove(&mut self, address: &Address) -> Result<StoredRecord, StoreError> {
        let record = self.get(address)?.ok_or(StoreError::NotFound(*address))?;
        self.db
            .delete(&mut *self.txn, address.as_bytes())
            .map_err(LmdbError::from)?;
        Ok(record)
    }
}

impl LmdbTxn<'_, '_> {
    fn put(&mut self, address: &Address, record: &StoredRecord) -> Result<(), StoreError> {
        let bytes = record.to_bytes()?;
        self.db
            .put(&mut *self.txn, address.as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        Ok(())
    }
}

impl RecordStore for LmdbRecordStore {
    fn transaction<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn RecordTxn) -> Result<R, E>,
        E: From<StoreError>,
    {
        let mut wtxn = self
            .env
            .write_txn()
            .map_err(|e| E::from(StoreError::from(LmdbError::from(e))))?;

        let result = {
            let mut txn = LmdbTxn {
                txn: &mut wtxn,
                db: self.records_db,
            };
            f(&mut txn)
        };

        match result {
            Ok(value) => {
                wtxn.commit()
                    .map_err(|e| E::from(StoreError::from(LmdbError::from(e))))?;
                Ok(value)
            }
            Err(e) => {
                wtxn.abort();
                Err(e)
            }
        }
    }

    fn fetch_or_null(&self, address: &Address) -> Result<Option<StoredRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .records_db
            .get(&rtxn, address.as_bytes())
            .map_err(LmdbError::from)?;
        val.map(StoredRecord::from_bytes).transpose()
    }

    fn fetch_many(&self, addresses: &[Address]) -> Result<Vec<Option<StoredRecord>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        addresses
            .iter()
            .map(|address| {
                self.records_db
                    .get(&rtxn, address.as_bytes())
                    .map_err(LmdbError::from)?
                    .map(StoredRecord::from_bytes)
                    .transpose()
            })
            .collect()
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.records_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }
}
