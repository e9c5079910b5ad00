//! The record store trait.

use civic_types::{Address, Identity};

use crate::{Record, RecordTxn, StoreError, StoredRecord};

/// Keyed storage of derived-address records with all-or-nothing transactions.
///
/// Backends implement [`transaction`](Self::transaction), [`fetch_or_null`](Self::fetch_or_null),
/// [`fetch_many`](Self::fetch_many) and [`record_count`](Self::record_count); the
/// single-step operations are built on top and inherit the same atomicity.
pub trait RecordStore: Send + Sync {
    /// Run `f` as one atomic unit.
    ///
    /// If `f` returns `Ok`, every write it made is committed together. If it
    /// returns `Err`, or the commit itself fails, nothing is written. Transactions
    /// are serialised: no two observe the same pre-state of an address they both
    /// write.
    fn transaction<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn RecordTxn) -> Result<R, E>,
        E: From<StoreError>;

    /// Non-failing existence check; `Err` only on backend failure.
    fn fetch_or_null(&self, address: &Address) -> Result<Option<StoredRecord>, StoreError>;

    /// Read several records from one committed snapshot.
    ///
    /// Results are in the order of `addresses`. Does not wait for, or block,
    /// writers on backends with concurrent readers.
    fn fetch_many(&self, addresses: &[Address]) -> Result<Vec<Option<StoredRecord>>, StoreError>;

    /// Number of committed records.
    fn record_count(&self) -> Result<u64, StoreError>;

    fn fetch(&self, address: &Address) -> Result<StoredRecord, StoreError> {
        self.fetch_or_null(address)?
            .ok_or(StoreError::NotFound(*address))
    }

    fn contains(&self, address: &Address) -> Result<bool, StoreError> {
        Ok(self.fetch_or_null(address)?.is_some())
    }

    /// Commit `record` at `address` unless something is already there.
    fn create_if_absent(&self, address: &Address, record: StoredRecord) -> Result<(), StoreError> {
        self.transaction(|txn| txn.insert(address, record))
    }

    /// Atomic read-modify-write of an existing record.
    ///
    /// `update` may not change the record's kind or owner.
    fn mutate<F>(&self, address: &Address, update: F) -> Result<StoredRecord, StoreError>
    where
        F: FnOnce(&mut StoredRecord) -> Result<(), StoreError>,
    {
        self.transaction(|txn| {
            let mut record = txn.get(address)?.ok_or(StoreError::NotFound(*address))?;
            let (kind, owner) = (record.kind, record.owner);
            update(&mut record)?;
            if record.kind != kind || record.owner != owner {
                return Err(StoreError::ConstraintViolation(format!(
                    "mutation of {} changed its kind or owner",
                    address
                )));
            }
            txn.update(address, record.clone())?;
            Ok(record)
        })
    }

    /// Remove the record at `address`. Only its owner may close it.
    fn close(&self, address: &Address, caller: &Identity) -> Result<StoredRecord, StoreError> {
        self.transaction(|txn| {
            let record = txn.get(address)?.ok_or(StoreError::NotFound(*address))?;
            if record.owner != *caller {
                return Err(StoreError::Unauthorized {
                    address: *address,
                    caller: *caller,
                });
            }
            txn.remove(address)
        })
    }

    /// Fetch and decode a typed record, if present.
    fn fetch_typed<T: Record>(&self, address: &Address) -> Result<Option<T>, StoreError> {
        self.fetch_or_null(address)?.map(|r| r.decode()).transpose()
    }
}
