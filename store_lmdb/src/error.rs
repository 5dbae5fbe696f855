use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("unsupported schema version {found}, this build supports {supported}")]
    SchemaVersion { found: u32, supported: u32 },
}

impl From<LmdbError> for linkgate_store::StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::Serialization(msg) => linkgate_store::StoreError::Serialization(msg),
            LmdbError::SchemaVersion { .. } => linkgate_store::StoreError::Corruption(e.to_string()),
            other => linkgate_store::StoreError::Backend(other.to_string()),
        }
    }
}
