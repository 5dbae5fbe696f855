use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] linkgate_store::StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] linkgate_store_lmdb::LmdbError),

    #[error("JSON store error: {0}")]
    JsonStore(#[from] linkgate_store_json::JsonStoreError),

    #[error("verification error: {0}")]
    Verification(#[from] linkgate_verification::VerificationError),

    #[error("RPC server error: {0}")]
    Rpc(#[from] linkgate_rpc::RpcError),

    #[error("logging error: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
