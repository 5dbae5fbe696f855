//! Challenge messages and the freshness window.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use linkgate_types::{Domain, Timestamp};

use crate::VerificationError;

/// Random bytes in a nonce (64 hex characters once encoded).
pub const NONCE_BYTES: usize = 32;

/// Default maximum age of a challenge timestamp.
pub const DEFAULT_MAX_AGE_MS: u64 = 2 * 60 * 1000;
/// Default tolerance for a challenge timestamp ahead of the server clock.
pub const DEFAULT_MAX_FUTURE_SKEW_MS: u64 = 30 * 1000;

/// A challenge handed to a client for signing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationChallenge {
    pub domain: Domain,
    pub timestamp: Timestamp,
    pub nonce: String,
    pub message: String,
}

/// Builds the canonical messages wallets sign.
pub struct ChallengeBuilder;

impl ChallengeBuilder {
    /// The ownership message. Pure: the same inputs always give the same bytes.
    pub fn build(domain: &Domain, timestamp: Timestamp, nonce: &str) -> String {
        format!(
            "Verify ownership of domain {} at {} with nonce {}",
            domain.as_str(),
            timestamp,
            nonce
        )
    }

    /// The message that authorizes removing a domain's verification.
    pub fn build_revocation(domain: &Domain, timestamp: Timestamp, nonce: &str) -> String {
        format!(
            "Revoke verification of domain {} at {} with nonce {}",
            domain.as_str(),
            timestamp,
            nonce
        )
    }

    /// 32 bytes from the OS CSPRNG, hex-encoded.
    pub fn generate_nonce() -> String {
        let mut bytes = [0u8; NONCE_BYTES];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Sanitize `raw_domain` and mint a fresh ownership challenge at `now`.
    pub fn issue(raw_domain: &str, now: Timestamp) -> Result<VerificationChallenge, VerificationError> {
        let domain = sanitize(raw_domain)?;
        let nonce = Self::generate_nonce();
        let message = Self::build(&domain, now, &nonce);
        Ok(VerificationChallenge {
            domain,
            timestamp: now,
            nonce,
            message,
        })
    }

    /// Like [`ChallengeBuilder::issue`], for the revocation message.
    pub fn issue_revocation(
        raw_domain: &str,
        now: Timestamp,
    ) -> Result<VerificationChallenge, VerificationError> {
        let domain = sanitize(raw_domain)?;
        let nonce = Self::generate_nonce();
        let message = Self::build_revocation(&domain, now, &nonce);
        Ok(VerificationChallenge {
            domain,
            timestamp: now,
            nonce,
            message,
        })
    }
}

pub(crate) fn sanitize(raw_domain: &str) -> Result<Domain, VerificationError> {
    Domain::sanitize(raw_domain).map_err(|e| VerificationError::InvalidDomain(e.to_string()))
}

/// A nonce is the hex form of [`NONCE_BYTES`] random bytes.
pub(crate) fn check_nonce(nonce: &str) -> Result<(), VerificationError> {
    if nonce.len() != NONCE_BYTES * 2 || !nonce.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(VerificationError::FormatError(format!(
            "nonce must be {} hex characters",
            NONCE_BYTES * 2
        )));
    }
    Ok(())
}

/// Accepted age range of a challenge timestamp.
///
/// A timestamp is fresh when `-max_future_skew_ms <= now - timestamp <= max_age_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessWindow {
    pub max_age_ms: u64,
    pub max_future_skew_ms: u64,
}

impl Default for FreshnessWindow {
    fn default() -> Self {
        Self {
            max_age_ms: DEFAULT_MAX_AGE_MS,
            max_future_skew_ms: DEFAULT_MAX_FUTURE_SKEW_MS,
        }
    }
}

impl FreshnessWindow {
    pub fn check(&self, timestamp: Timestamp, now: Timestamp) -> Result<(), VerificationError> {
        let age_ms = timestamp.age_at(now);
        let too_old = age_ms > 0 && age_ms as u64 > self.max_age_ms;
        let too_new = age_ms < 0 && age_ms.unsigned_abs() > self.max_future_skew_ms;
        if too_old || too_new {
            return Err(VerificationError::StaleOrFutureTimestamp { age_ms });
        }
        Ok(())
    }
}
