//! Nullable store: thread-safe in-memory record storage for testing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use civic_store::{RecordStore, RecordTxn, StoreError, StoredRecord};
use civic_types::Address;

/// An in-memory [`RecordStore`].
///
/// The whole map is locked for the duration of a transaction, so transactions
/// are serialised exactly like LMDB's single writer. Writes are staged in an
/// overlay and only applied when the closure returns `Ok`.
#[derive(Default)]
pub struct NullRecordStore {
    records: Mutex<BTreeMap<Address, StoredRecord>>,
    fail_next_commit: AtomicBool,
}

impl NullRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next transaction that would commit fail with a backend error
    /// instead, leaving the store untouched.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Snapshot of every committed record, in address order.
    pub fn snapshot(&self) -> Vec<(Address, StoredRecord)> {
        self.lock()
            .iter()
            .map(|(a, r)| (*a, r.clone()))
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<Address, StoredRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Staged writes over a locked view of the committed map.
/// `None` in the overlay marks a removal.
struct OverlayTxn<'a> {
    base: &'a BTreeMap<Address, StoredRecord>,
    staged: BTreeMap<Address, Option<StoredRecord>>,
}

impl RecordTxn for OverlayTxn<'_> {
    fn get(&self, address: &Address) -> Result<Option<StoredRecord>, StoreError> {
        match self.staged.get(address) {
            Some(staged) => Ok(staged.clone()),
            None => Ok(self.base.get(address).cloned()),
        }
    }

    fn insert(&mut self, address: &Address, record: StoredRecord) -> Result<(), StoreError> {
        if self.get(address)?.is_some() {
            return Err(StoreError::AlreadyExists(*address));
        }
        self.staged.insert(*address, Some(record));
        Ok(())
    }

    fn update(&mut self, address: &Address, record: StoredRecord) -> Result<(), StoreError> {
        if self.get(address)?.is_none() {
            return Err(StoreError::NotFound(*address));
        }
        self.staged.insert(*address, Some(record));
        Ok(())
    }

    fn remove(&mut self, address: &Address) -> Result<StoredRecord, StoreError> {
        let record = self.get(address)?.ok_or(StoreError::NotFound(*address))?;
        self.staged.insert(*address, None);
        Ok(record)
    }
}

impl RecordStore for NullRecordStore {
    fn transaction<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn RecordTxn) -> Result<R, E>,
        E: From<StoreError>,
    {
        let mut records = self.lock();
        let mut txn = OverlayTxn {
            base: &records,
            staged: BTreeMap::new(),
        };
        let value = f(&mut txn)?;
        let staged = txn.staged;

        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(E::from(StoreError::Backend(
                "injected commit failure".into(),
            )));
        }

        for (address, entry) in staged {
            match entry {
                Some(record) => {
                    records.insert(address, record);
                }
                None => {
                    records.remove(&address);
                }
            }
        }
        Ok(value)
    }

    fn fetch_or_null(&self, address: &Address) -> Result<Option<StoredRecord>, StoreError> {
        Ok(self.lock().get(address).cloned())
    }

    fn fetch_many(&self, addresses: &[Address]) -> Result<Vec<Option<StoredRecord>>, StoreError> {
        let records = self.lock();
        Ok(addresses.iter().map(|a| records.get(a).cloned()).collect())
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        Ok(self.lock().len() as u64)
    }
}
