//! JSON file implementation of VerificationStore.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use linkgate_store::{StoreError, VerificationStore};
use linkgate_types::{Domain, VerificationRecord};

use crate::JsonStoreError;

type Records = BTreeMap<String, VerificationRecord>;

/// Domain-keyed records persisted as a single JSON object.
///
/// The mutex serializes writers: a mutation is applied to a copy of the map,
/// the copy is written out, and only then does it replace the in-memory state.
/// A failed write therefore leaves both the file and the map unchanged.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: Mutex<Records>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating parent directories if needed.
    /// A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, JsonStoreError> {
        let path = path.into();
        let records = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            let records: Records = if raw.trim().is_empty() {
                Records::new()
            } else {
                serde_json::from_str(&raw)?
            };
            for (key, record) in &records {
                if key != record.domain.as_str() {
                    return Err(JsonStoreError::KeyMismatch {
                        key: key.clone(),
                        domain: record.domain.as_str().to_string(),
                    });
                }
            }
            records
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            Records::new()
        };
        tracing::info!(path = %path.display(), records = records.len(), "opened JSON store");
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Records>, JsonStoreError> {
        self.records.lock().map_err(|_| JsonStoreError::Poisoned)
    }

    /// Apply `mutate` to a copy of the records, persist the copy, then commit it.
    fn mutate<T>(&self, mutate: impl FnOnce(&mut Records) -> T) -> Result<T, JsonStoreError> {
        let mut guard = self.lock()?;
        let mut next = guard.clone();
        let out = mutate(&mut next);
        write_atomically(&self.path, &next)?;
        *guard = next;
        Ok(out)
    }
}

fn write_atomically(path: &Path, records: &Records) -> Result<(), JsonStoreError> {
    let encoded = serde_json::to_vec_pretty(records)?;
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&encoded)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

impl VerificationStore for JsonFileStore {
    fn upsert(&self, record: &VerificationRecord) -> Result<(), StoreError> {
        let key = record.domain.as_str().to_string();
        let record = record.clone();
        self.mutate(move |records| {
            records.insert(key, record);
        })?;
        Ok(())
    }

    fn get(&self, domain: &Domain) -> Result<Option<VerificationRecord>, StoreError> {
        Ok(self.lock()?.get(domain.as_str()).cloned())
    }

    fn delete(&self, domain: &Domain) -> Result<bool, StoreError> {
        if !self.lock()?.contains_key(domain.as_str()) {
            return Ok(false);
        }
        let removed = self.mutate(|records| records.remove(domain.as_str()).is_some())?;
        Ok(removed)
    }

    fn list(&self) -> Result<Vec<VerificationRecord>, StoreError> {
        Ok(self.lock()?.values().cloned().collect())
    }
}
