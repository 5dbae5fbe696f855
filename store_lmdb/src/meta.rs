//! Schema bookkeeping in the `meta` database.

use heed::types::Bytes;
use heed::{Database, RwTxn};

use crate::LmdbError;

/// The schema version that the current code writes.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

/// Stamp a fresh database with the current version, or check an existing one.
pub(crate) fn ensure_schema(
    wtxn: &mut RwTxn<'_>,
    meta_db: &Database<Bytes, Bytes>,
) -> Result<(), LmdbError> {
    let stored = match meta_db.get(wtxn, SCHEMA_VERSION_KEY)? {
        Some(bytes) => {
            let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                LmdbError::Serialization("schema_version has unexpected byte length".to_string())
            })?;
            Some(u32::from_le_bytes(arr))
        }
        None => None,
    };

    match stored {
        None => {
            meta_db.put(wtxn, SCHEMA_VERSION_KEY, &CURRENT_SCHEMA_VERSION.to_le_bytes())?;
            tracing::info!(version = CURRENT_SCHEMA_VERSION, "initialized database schema");
            Ok(())
        }
        Some(v) if v == CURRENT_SCHEMA_VERSION => Ok(()),
        Some(found) => Err(LmdbError::SchemaVersion {
            found,
            supported: CURRENT_SCHEMA_VERSION,
        }),
    }
}
