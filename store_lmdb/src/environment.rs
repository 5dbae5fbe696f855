//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::meta;
use crate::{LmdbError, LmdbVerificationStore};

/// Named databases in the environment.
const MAX_DBS: u32 = 2;
const VERIFICATIONS_DB: &str = "verifications";
const META_DB: &str = "meta";

/// Default map size: 64 MiB is ample for domain-keyed records.
pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;

/// Wraps the LMDB environment and its database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    verifications_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment in the directory `path`.
    ///
    /// Creates the directory and both databases on first use and refuses to
    /// open a database written by a newer schema.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the environment is opened once per process for this path and
        // the memory map is never modified outside of heed transactions.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let verifications_db: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, Some(VERIFICATIONS_DB))?;
        let meta_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(META_DB))?;
        meta::ensure_schema(&mut wtxn, &meta_db)?;
        wtxn.commit()?;

        tracing::info!(path = %path.display(), "opened LMDB environment");
        Ok(Self {
            env: Arc::new(env),
            verifications_db,
        })
    }

    /// A store handle sharing this environment.
    pub fn verification_store(&self) -> LmdbVerificationStore {
        LmdbVerificationStore {
            env: Arc::clone(&self.env),
            verifications_db: self.verifications_db,
        }
    }
}
