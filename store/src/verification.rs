//! Verification record storage trait.

use linkgate_types::{Domain, VerificationRecord};

use crate::StoreError;

/// Domain-keyed persistence of [`VerificationRecord`]s.
///
/// At most one record exists per domain; `upsert` overwrites. Each call is
/// atomic with respect to its key, and a successful write survives a restart
/// of the backend.
pub trait VerificationStore: Send + Sync {
    /// Insert or replace the record for `record.domain`.
    fn upsert(&self, record: &VerificationRecord) -> Result<(), StoreError>;

    fn get(&self, domain: &Domain) -> Result<Option<VerificationRecord>, StoreError>;

    /// Remove the record for `domain`. Returns whether one existed.
    fn delete(&self, domain: &Domain) -> Result<bool, StoreError>;

    /// All records, ordered by domain.
    fn list(&self) -> Result<Vec<VerificationRecord>, StoreError>;
}
