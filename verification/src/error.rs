use thiserror::Error;

use linkgate_crypto::CryptoError;

/// Why a verification, query or revocation was rejected.
///
/// Every variant is terminal for the attempt; there is no "unverified but
/// allowed" outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    #[error("nonce has already been used; request a new challenge")]
    ReplayDetected,

    #[error("invalid address format: {0}")]
    InvalidAddressFormat(String),

    #[error("signing address does not match the expected address")]
    AddressMismatch,

    #[error("timestamp is {age_ms} ms old, outside the accepted window; request a new challenge")]
    StaleOrFutureTimestamp { age_ms: i64 },

    #[error("message does not match the challenge for this domain, timestamp and nonce")]
    MessageMismatch,

    #[error("malformed key material: {0}")]
    FormatError(String),

    #[error("public key does not control the claimed address")]
    KeySubstitution,

    #[error("signature verification failed")]
    InvalidSignature,

    #[error("signature verification is unavailable: {0}")]
    CryptoUnavailable(String),

    #[error("failed to persist verification: {0}")]
    StorageFailure(String),

    #[error("no verification found for domain {0}")]
    NotFound(String),

    #[error("domain {0} is not verified")]
    NotVerified(String),
}

impl VerificationError {
    /// Stable machine-readable name of the failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFields(_) => "MissingFields",
            Self::InvalidDomain(_) => "InvalidDomain",
            Self::ReplayDetected => "ReplayDetected",
            Self::InvalidAddressFormat(_) => "InvalidAddressFormat",
            Self::AddressMismatch => "AddressMismatch",
            Self::StaleOrFutureTimestamp { .. } => "StaleOrFutureTimestamp",
            Self::MessageMismatch => "MessageMismatch",
            Self::FormatError(_) => "FormatError",
            Self::KeySubstitution => "KeySubstitution",
            Self::InvalidSignature => "InvalidSignature",
            Self::CryptoUnavailable(_) => "CryptoUnavailable",
            Self::StorageFailure(_) => "StorageFailure",
            Self::NotFound(_) => "NotFound",
            Self::NotVerified(_) => "NotVerified",
        }
    }
}

impl From<CryptoError> for VerificationError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::SelfTest(msg) => Self::CryptoUnavailable(msg),
            other => Self::FormatError(other.to_string()),
        }
    }
}

impl From<linkgate_store::StoreError> for VerificationError {
    fn from(e: linkgate_store::StoreError) -> Self {
        Self::StorageFailure(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_lists_names() {
        let e = VerificationError::MissingFields(vec!["domain", "nonce"]);
        assert_eq!(e.to_string(), "missing required fields: domain, nonce");
        assert_eq!(e.code(), "MissingFields");
    }

    #[test]
    fn crypto_errors_map_by_kind() {
        let format: VerificationError = CryptoError::Format("bad hex".into()).into();
        assert_eq!(format.code(), "FormatError");
        let selftest: VerificationError = CryptoError::SelfTest("boom".into()).into();
        assert_eq!(selftest.code(), "CryptoUnavailable");
    }
}
