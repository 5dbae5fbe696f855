use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Hex string of the wrong length, non-hex characters, or bytes that do
    /// not decode to a valid curve point.
    #[error("format error: {0}")]
    Format(String),

    #[error("key derivation failed: {0}")]
    Derivation(String),

    #[error("invalid address: {0}")]
    Address(String),

    #[error("crypto self-test failed: {0}")]
    SelfTest(String),
}
