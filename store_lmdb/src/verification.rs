//! LMDB implementation of VerificationStore.
//!
//! Key = sanitized domain bytes, value = bincode-encoded record. Each
//! mutation is a single write transaction.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use linkgate_store::{StoreError, VerificationStore};
use linkgate_types::{Domain, VerificationRecord};

use crate::LmdbError;

pub struct LmdbVerificationStore {
    pub(crate) env: Arc<Env>,
    pub(crate) verifications_db: Database<Bytes, Bytes>,
}

fn decode(bytes: &[u8]) -> Result<VerificationRecord, LmdbError> {
    bincode::deserialize(bytes).map_err(|e| LmdbError::Serialization(e.to_string()))
}

impl VerificationStore for LmdbVerificationStore {
    fn upsert(&self, record: &VerificationRecord) -> Result<(), StoreError> {
        let value =
            bincode::serialize(record).map_err(|e| LmdbError::Serialization(e.to_string()))?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.verifications_db
            .put(&mut wtxn, record.domain.as_str().as_bytes(), &value)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get(&self, domain: &Domain) -> Result<Option<VerificationRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let value = self
            .verifications_db
            .get(&rtxn, domain.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        match value {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn delete(&self, domain: &Domain) -> Result<bool, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let existed = self
            .verifications_db
            .delete(&mut wtxn, domain.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(existed)
    }

    fn list(&self) -> Result<Vec<VerificationRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self
            .verifications_db
            .iter(&rtxn)
            .map_err(LmdbError::from)?;
        // LMDB iterates in byte order of the key, which is the domain order.
        let mut records = Vec::new();
        for entry in iter {
            let (_key, value) = entry.map_err(LmdbError::from)?;
            records.push(decode(value)?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::DEFAULT_MAP_SIZE;
    use crate::LmdbEnvironment;
    use linkgate_types::{ChainAddress, Timestamp};

    fn record(domain: &str, verified_at: u64) -> VerificationRecord {
        VerificationRecord {
            domain: Domain::sanitize(domain).unwrap(),
            address: ChainAddress::from_encoded(format!("xch1{}", "q".repeat(58))),
            verified: true,
            verified_at: Timestamp::from_millis(verified_at),
            signature: "ab".repeat(96),
            public_key: "cd".repeat(48),
            message: format!("Verify ownership of domain {domain} at {verified_at} with nonce 00"),
            nonce: "00".repeat(32),
        }
    }

    #[test]
    fn upsert_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        let store = env.verification_store();
        let alice = Domain::sanitize("alice").unwrap();

        assert!(store.get(&alice).unwrap().is_none());
        store.upsert(&record("alice", 1)).unwrap();
        assert_eq!(store.get(&alice).unwrap(), Some(record("alice", 1)));

        assert!(store.delete(&alice).unwrap());
        assert!(!store.delete(&alice).unwrap());
        assert!(store.get(&alice).unwrap().is_none());
    }

    #[test]
    fn upsert_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        let store = env.verification_store();
        store.upsert(&record("bob", 1)).unwrap();
        store.upsert(&record("bob", 2)).unwrap();
        assert_eq!(store.list().unwrap(), vec![record("bob", 2)]);
    }

    #[test]
    fn list_is_ordered_by_domain() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        let store = env.verification_store();
        for d in ["carol", "alice", "bob"] {
            store.upsert(&record(d, 5)).unwrap();
        }
        let domains: Vec<String> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|r| r.domain.as_str().to_string())
            .collect();
        assert_eq!(domains, ["alice", "bob", "carol"]);
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
            env.verification_store().upsert(&record("alice", 42)).unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        let got = env
            .verification_store()
            .get(&Domain::sanitize("alice").unwrap())
            .unwrap();
        assert_eq!(got, Some(record("alice", 42)));
    }
}
