//! Submitted verification and revocation requests.
//!
//! Every field is optional at the wire level so that absent and empty fields
//! are reported together as [`VerificationError::MissingFields`] rather than
//! failing deserialization one at a time.

use serde::{Deserialize, Serialize};

use crate::VerificationError;

/// Body of `POST /verify`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub domain: Option<String>,
    pub expected_address: Option<String>,
    pub message: Option<String>,
    pub signature: Option<String>,
    pub public_key: Option<String>,
    pub timestamp: Option<u64>,
    pub signing_address: Option<String>,
    pub nonce: Option<String>,
}

/// Body of a signed `DELETE /verify`. The domain may instead come from the query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeRequest {
    pub domain: Option<String>,
    pub message: Option<String>,
    pub signature: Option<String>,
    pub public_key: Option<String>,
    pub timestamp: Option<u64>,
    pub nonce: Option<String>,
}

/// A [`VerifyRequest`] with every field present and non-empty.
#[derive(Debug)]
pub(crate) struct VerifyFields {
    pub domain: String,
    pub expected_address: String,
    pub message: String,
    pub signature: String,
    pub public_key: String,
    pub timestamp: u64,
    pub signing_address: String,
    pub nonce: String,
}

#[derive(Debug)]
pub(crate) struct RevokeFields {
    pub domain: String,
    pub message: String,
    pub signature: String,
    pub public_key: String,
    pub timestamp: u64,
    pub nonce: String,
}

/// Collects the names of absent or empty fields.
struct Presence(Vec<&'static str>);

impl Presence {
    fn text(&mut self, name: &'static str, value: Option<String>) -> String {
        match value {
            Some(v) if !v.is_empty() => v,
            _ => {
                self.0.push(name);
                String::new()
            }
        }
    }

    fn number(&mut self, name: &'static str, value: Option<u64>) -> u64 {
        value.unwrap_or_else(|| {
            self.0.push(name);
            0
        })
    }

    fn finish<T>(self, value: T) -> Result<T, VerificationError> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(VerificationError::MissingFields(self.0))
        }
    }
}

impl VerifyRequest {
    pub(crate) fn into_fields(self) -> Result<VerifyFields, VerificationError> {
        let mut p = Presence(Vec::new());
        let fields = VerifyFields {
            domain: p.text("domain", self.domain),
            expected_address: p.text("expectedAddress", self.expected_address),
            message: p.text("message", self.message),
            signature: p.text("signature", self.signature),
            public_key: p.text("publicKey", self.public_key),
            timestamp: p.number("timestamp", self.timestamp),
            signing_address: p.text("signingAddress", self.signing_address),
            nonce: p.text("nonce", self.nonce),
        };
        p.finish(fields)
    }
}

impl RevokeRequest {
    pub(crate) fn into_fields(self) -> Result<RevokeFields, VerificationError> {
        let mut p = Presence(Vec::new());
        let fields = RevokeFields {
            domain: p.text("domain", self.domain),
            message: p.text("message", self.message),
            signature: p.text("signature", self.signature),
            public_key: p.text("publicKey", self.public_key),
            timestamp: p.number("timestamp", self.timestamp),
            nonce: p.text("nonce", self.nonce),
        };
        p.finish(fields)
    }
}
