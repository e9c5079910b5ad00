//! The view of the store inside one atomic unit.

use civic_types::{Address, Identity};

use crate::{Record, StoreError, StoredRecord};

/// Reads and writes made inside a [`RecordStore::transaction`](crate::RecordStore::transaction).
///
/// Reads observe the transaction's own earlier writes. Nothing is visible to other
/// transactions until the closure returns `Ok`.
pub trait RecordTxn {
    /// Read the record at `address`, if any.
    fn get(&self, address: &Address) -> Result<Option<StoredRecord>, StoreError>;

    /// Create a record. Fails with `AlreadyExists` if one is present.
    fn insert(&mut self, address: &Address, record: StoredRecord) -> Result<(), StoreError>;

    /// Replace an existing record. Fails with `NotFound` if none is present.
    fn update(&mut self, address: &Address, record: StoredRecord) -> Result<(), StoreError>;

    /// Remove a record and return it. Fails with `NotFound` if none is present.
    fn remove(&mut self, address: &Address) -> Result<StoredRecord, StoreError>;
}

/// Typed helpers over any [`RecordTxn`].
pub trait RecordTxnExt: RecordTxn {
    /// Load and decode the record at `address`; `NotFound` if absent.
    fn load<T: Record>(&self, address: &Address) -> Result<T, StoreError> {
        self.get(address)?
            .ok_or(StoreError::NotFound(*address))?
            .decode()
    }

    /// Load and decode the record at `address`, if present.
    fn load_opt<T: Record>(&self, address: &Address) -> Result<Option<T>, StoreError> {
        self.get(address)?.map(|r| r.decode()).transpose()
    }

    /// Create a typed record owned by `owner`; `AlreadyExists` if the address is taken.
    fn create<T: Record>(
        &mut self,
        address: &Address,
        owner: Identity,
        value: &T,
    ) -> Result<(), StoreError> {
        self.insert(address, StoredRecord::encode(owner, value)?)
    }

    /// Replace the typed record at `address`, keeping its owner.
    fn save<T: Record>(&mut self, address: &Address, value: &T) -> Result<(), StoreError> {
        let existing = self.get(address)?.ok_or(StoreError::NotFound(*address))?;
        if existing.kind != T::KIND {
            return Err(StoreError::KindMismatch {
                expected: T::KIND,
                actual: existing.kind,
            });
        }
        self.update(address, StoredRecord::encode(existing.owner, value)?)
    }
}

impl<T: RecordTxn + ?Sized> RecordTxnExt for T {}
