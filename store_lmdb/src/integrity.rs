//! LMDB record integrity checks.
//!
//! Run on startup to detect corruption early, before the node begins
//! executing instructions.

use std::path::Path;

use civic_store::StoredRecord;

use crate::{LmdbError, LmdbRecordStore};

/// Summary of an integrity check run.
#[derive(Debug)]
pub struct IntegrityReport {
    pub records_checked: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Walk every record and check that its key is an address and its value decodes.
///
/// Bad entries are recorded in the report rather than causing a hard error.
pub fn check_integrity(store: &LmdbRecordStore) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport {
        records_checked: 0,
        errors: Vec::new(),
    };

    let rtxn = store.env.read_txn()?;
    for entry in store.records_db.iter(&rtxn)? {
        let (key, value) = match entry {
            Ok(kv) => kv,
            Err(e) => {
                report.errors.push(format!("failed to read record: {}", e));
                continue;
            }
        };
        report.records_checked += 1;

        if key.len() != 32 {
            report
                .errors
                .push(format!("record key has length {}, expected 32", key.len()));
            continue;
        }
        if let Err(e) = StoredRecord::from_bytes(value) {
            report
                .errors
                .push(format!("record {} does not decode: {}", hex::encode(key), e));
        }
    }

    Ok(report)
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent) directory. Returns an error
/// if the directory exists but `data.mdb` is missing.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    let data_file = path.join("data.mdb");
    if !data_file.exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}
