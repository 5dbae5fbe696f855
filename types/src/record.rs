//! The persisted proof that a domain is controlled by a chain address.

use serde::{Deserialize, Serialize};

use crate::{ChainAddress, Domain, Timestamp};

/// A successful ownership verification.
///
/// At most one record exists per domain; a new verification overwrites the
/// old one. `signature`, `public_key`, `message` and `nonce` are kept as the
/// audit trail of the proof that produced the record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRecord {
    pub domain: Domain,
    pub address: ChainAddress,
    pub verified: bool,
    pub verified_at: Timestamp,
    pub signature: String,
    pub public_key: String,
    pub message: String,
    pub nonce: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> VerificationRecord {
        VerificationRecord {
            domain: Domain::sanitize("alice").unwrap(),
            address: ChainAddress::from_encoded(format!("xch1{}", "q".repeat(58))),
            verified: true,
            verified_at: Timestamp::from_millis(1_700_000_000_000),
            signature: "aa".repeat(96),
            public_key: "bb".repeat(48),
            message: "Verify ownership of domain alice at 1 with nonce 00".into(),
            nonce: "00".repeat(32),
        }
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let json = serde_json::to_value(record()).unwrap();
        assert!(json.get("verifiedAt").is_some());
        assert!(json.get("publicKey").is_some());
        assert_eq!(json["verifiedAt"], 1_700_000_000_000u64);
    }

    #[test]
    fn bincode_roundtrip_is_exact() {
        let r = record();
        let bytes = bincode::serialize(&r).unwrap();
        let back: VerificationRecord = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, r);
    }
}
