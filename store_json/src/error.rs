use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("record stored under {key:?} belongs to domain {domain:?}")]
    KeyMismatch { key: String, domain: String },

    #[error("store lock poisoned")]
    Poisoned,
}

impl From<JsonStoreError> for linkgate_store::StoreError {
    fn from(e: JsonStoreError) -> Self {
        match e {
            JsonStoreError::Encoding(err) => linkgate_store::StoreError::Serialization(err.to_string()),
            JsonStoreError::KeyMismatch { .. } => linkgate_store::StoreError::Corruption(e.to_string()),
            other => linkgate_store::StoreError::Backend(other.to_string()),
        }
    }
}
