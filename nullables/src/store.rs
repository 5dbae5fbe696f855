//! Nullable store: thread-safe in-memory storage for testing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use linkgate_store::{StoreError, VerificationStore};
use linkgate_types::{Domain, VerificationRecord};

/// An in-memory verification store for testing.
///
/// `fail_writes(true)` makes every `upsert`/`delete` return a backend error,
/// for exercising the storage-failure paths.
#[derive(Debug, Default)]
pub struct NullVerificationStore {
    records: Mutex<BTreeMap<String, VerificationRecord>>,
    fail_writes: AtomicBool,
}

impl NullVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".to_string()));
        }
        Ok(())
    }
}

impl VerificationStore for NullVerificationStore {
    fn upsert(&self, record: &VerificationRecord) -> Result<(), StoreError> {
        self.check_writable()?;
        self.records
            .lock()
            .unwrap()
            .insert(record.domain.as_str().to_string(), record.clone());
        Ok(())
    }

    fn get(&self, domain: &Domain) -> Result<Option<VerificationRecord>, StoreError> {
        Ok(self.records.lock().unwrap().get(domain.as_str()).cloned())
    }

    fn delete(&self, domain: &Domain) -> Result<bool, StoreError> {
        self.check_writable()?;
        Ok(self.records.lock().unwrap().remove(domain.as_str()).is_some())
    }

    fn list(&self) -> Result<Vec<VerificationRecord>, StoreError> {
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }
}
