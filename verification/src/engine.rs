//! The verification engine. Runs every gate of an ownership proof and owns
//! the record lifecycle (verify → query → revoke).
//!
//! Gate order for [`VerificationEngine::verify`]:
//!
//! | # | gate                    | rejection                |
//! |---|-------------------------|--------------------------|
//! | 0 | crypto readiness        | `CryptoUnavailable`      |
//! | 1 | field presence          | `MissingFields`          |
//! | 2 | domain sanitation       | `InvalidDomain`          |
//! | 3 | nonce format            | `FormatError`            |
//! | 4 | nonce consumption       | `ReplayDetected`         |
//! | 5 | address format          | `InvalidAddressFormat`   |
//! | 6 | address equality        | `AddressMismatch`        |
//! | 7 | freshness               | `StaleOrFutureTimestamp` |
//! | 8 | message reconstruction  | `MessageMismatch`        |
//! | 9 | key/signature format    | `FormatError`            |
//! |10 | key-to-address binding  | `KeySubstitution`        |
//! |11 | signature               | `InvalidSignature`       |
//!
//! A rejection after gate 4 releases the nonce. Once every gate has passed
//! the nonce stays consumed, even if the store then fails to persist.

use std::sync::Arc;

use linkgate_crypto::{CryptoProvider, MessageEncoding, PublicKey, Signature};
use linkgate_store::VerificationStore;
use linkgate_types::{ChainAddress, Clock, NetworkId, Timestamp, VerificationRecord};

use crate::challenge::{check_nonce, sanitize, ChallengeBuilder, FreshnessWindow, VerificationChallenge};
use crate::nonce::{NonceRegistry, NonceReservation};
use crate::request::{RevokeRequest, VerifyRequest};
use crate::{CryptoGate, VerificationError};

/// Tunables of the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub freshness: FreshnessWindow,
    pub message_encoding: MessageEncoding,
}

/// Result of a revocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevokeOutcome {
    Removed,
    NotFound,
}

pub struct VerificationEngine {
    store: Arc<dyn VerificationStore>,
    nonces: Arc<NonceRegistry>,
    crypto: CryptoGate,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl VerificationEngine {
    pub fn new(
        store: Arc<dyn VerificationStore>,
        nonces: Arc<NonceRegistry>,
        crypto: Arc<dyn CryptoProvider>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            nonces,
            crypto: CryptoGate::new(crypto),
            clock,
            config,
        }
    }

    pub fn nonces(&self) -> &Arc<NonceRegistry> {
        &self.nonces
    }

    pub fn crypto_ready(&self) -> bool {
        self.crypto.is_ready()
    }

    /// Run the crypto self-test now instead of on the first write.
    pub async fn warm_up(&self) -> Result<(), VerificationError> {
        self.crypto.ready().await.map(|_| ())
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Mint a fresh ownership challenge for `raw_domain`.
    pub fn issue_challenge(&self, raw_domain: &str) -> Result<VerificationChallenge, VerificationError> {
        ChallengeBuilder::issue(raw_domain, self.clock.now())
    }

    /// Mint a fresh revocation challenge for `raw_domain`.
    pub fn issue_revocation_challenge(
        &self,
        raw_domain: &str,
    ) -> Result<VerificationChallenge, VerificationError> {
        ChallengeBuilder::issue_revocation(raw_domain, self.clock.now())
    }

    /// Verify an ownership proof and persist the resulting record.
    pub async fn verify(&self, request: VerifyRequest) -> Result<VerificationRecord, VerificationError> {
        let domain_hint = request.domain.clone().unwrap_or_default();
        let result = self.run_verify(request).await;
        match &result {
            Ok(record) => tracing::info!(
                domain = record.domain.as_str(),
                address = record.address.as_str(),
                "domain verified"
            ),
            Err(e) => tracing::warn!(domain = %domain_hint, reason = e.code(), "verification rejected: {e}"),
        }
        result
    }

    async fn run_verify(&self, request: VerifyRequest) -> Result<VerificationRecord, VerificationError> {
        let crypto = self.crypto.ready().await?;
        let fields = request.into_fields()?;
        let domain = sanitize(&fields.domain)?;
        check_nonce(&fields.nonce)?;

        let now = self.clock.now();
        let reservation = NonceReservation::acquire(&self.nonces, &fields.nonce, now)
            .ok_or(VerificationError::ReplayDetected)?;

        let network = crypto.network();
        let expected = parse_address(&fields.expected_address, network)?;
        let signing = parse_address(&fields.signing_address, network)?;
        if signing != expected {
            return Err(VerificationError::AddressMismatch);
        }

        let timestamp = Timestamp::from_millis(fields.timestamp);
        self.config.freshness.check(timestamp, now)?;
        if ChallengeBuilder::build(&domain, timestamp, &fields.nonce) != fields.message {
            return Err(VerificationError::MessageMismatch);
        }

        let (public_key, signature) = parse_key_material(crypto.as_ref(), &fields.public_key, &fields.signature)?;
        if crypto.derive_address(&public_key)? != expected {
            return Err(VerificationError::KeySubstitution);
        }
        let payload = crypto.signing_payload(self.config.message_encoding, &fields.message);
        if !crypto.verify(&payload, &signature, &public_key) {
            return Err(VerificationError::InvalidSignature);
        }

        // The proof is valid from here on; it must never become replayable.
        reservation.commit();
        let record = VerificationRecord {
            domain,
            address: expected,
            verified: true,
            verified_at: now,
            signature: signature.to_hex(),
            public_key: public_key.to_hex(),
            message: fields.message,
            nonce: fields.nonce,
        };
        self.store.upsert(&record)?;
        Ok(record)
    }

    /// Look up the record for `raw_domain`. No side effects.
    pub fn query(&self, raw_domain: &str) -> Result<VerificationRecord, VerificationError> {
        let domain = sanitize(raw_domain)?;
        self.store
            .get(&domain)?
            .ok_or_else(|| VerificationError::NotFound(domain.as_str().to_string()))
    }

    /// Unconditionally delete the record for `raw_domain`.
    pub fn revoke(&self, raw_domain: &str) -> Result<RevokeOutcome, VerificationError> {
        let domain = sanitize(raw_domain)?;
        let outcome = if self.store.delete(&domain)? {
            tracing::info!(domain = domain.as_str(), "verification revoked");
            RevokeOutcome::Removed
        } else {
            RevokeOutcome::NotFound
        };
        Ok(outcome)
    }

    /// Delete the record for a domain, authorized by a signature from the key
    /// that controls the verified address.
    pub async fn revoke_signed(&self, request: RevokeRequest) -> Result<RevokeOutcome, VerificationError> {
        let domain_hint = request.domain.clone().unwrap_or_default();
        let result = self.run_revoke_signed(request).await;
        match &result {
            Ok(_) => tracing::info!(domain = %domain_hint, "verification revoked by owner"),
            Err(e) => tracing::warn!(domain = %domain_hint, reason = e.code(), "revocation rejected: {e}"),
        }
        result
    }

    async fn run_revoke_signed(&self, request: RevokeRequest) -> Result<RevokeOutcome, VerificationError> {
        let crypto = self.crypto.ready().await?;
        let fields = request.into_fields()?;
        let domain = sanitize(&fields.domain)?;
        check_nonce(&fields.nonce)?;

        let now = self.clock.now();
        let reservation = NonceReservation::acquire(&self.nonces, &fields.nonce, now)
            .ok_or(VerificationError::ReplayDetected)?;

        let timestamp = Timestamp::from_millis(fields.timestamp);
        self.config.freshness.check(timestamp, now)?;
        if ChallengeBuilder::build_revocation(&domain, timestamp, &fields.nonce) != fields.message {
            return Err(VerificationError::MessageMismatch);
        }

        let (public_key, signature) = parse_key_material(crypto.as_ref(), &fields.public_key, &fields.signature)?;
        let record = self
            .store
            .get(&domain)?
            .ok_or_else(|| VerificationError::NotFound(domain.as_str().to_string()))?;
        if crypto.derive_address(&public_key)? != record.address {
            return Err(VerificationError::KeySubstitution);
        }
        let payload = crypto.signing_payload(self.config.message_encoding, &fields.message);
        if !crypto.verify(&payload, &signature, &public_key) {
            return Err(VerificationError::InvalidSignature);
        }

        reservation.commit();
        if self.store.delete(&domain)? {
            Ok(RevokeOutcome::Removed)
        } else {
            Ok(RevokeOutcome::NotFound)
        }
    }

    /// The record for `raw_domain` if it is verified and, when `address` is
    /// given, bound to that address. Other write paths call this before
    /// accepting changes for a domain.
    pub fn require_verified(
        &self,
        raw_domain: &str,
        address: Option<&str>,
    ) -> Result<VerificationRecord, VerificationError> {
        let record = match self.query(raw_domain) {
            Ok(record) => record,
            Err(VerificationError::NotFound(domain)) => {
                return Err(VerificationError::NotVerified(domain))
            }
            Err(e) => return Err(e),
        };
        let bound = address.map_or(true, |a| record.address.as_str() == a);
        if !record.verified || !bound {
            return Err(VerificationError::NotVerified(record.domain.as_str().to_string()));
        }
        Ok(record)
    }
}

fn parse_address(raw: &str, network: NetworkId) -> Result<ChainAddress, VerificationError> {
    ChainAddress::parse(raw, network).map_err(|e| VerificationError::InvalidAddressFormat(e.to_string()))
}

fn parse_key_material(
    crypto: &dyn CryptoProvider,
    public_key: &str,
    signature: &str,
) -> Result<(PublicKey, Signature), VerificationError> {
    let public_key = crypto.parse_public_key(public_key)?;
    let signature = crypto.parse_signature(signature)?;
    Ok((public_key, signature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkgate_crypto::SecretKey;
    use linkgate_types::Domain;
    use linkgate_nullables::{NullClock, NullCryptoProvider, NullVerificationStore};

    const NOW: u64 = 1_700_000_000_000;

    struct Harness {
        engine: VerificationEngine,
        store: Arc<NullVerificationStore>,
        clock: Arc<NullClock>,
    }

    fn harness() -> Harness {
        let store = Arc::new(NullVerificationStore::new());
        let clock = Arc::new(NullClock::new(NOW));
        let engine = VerificationEngine::new(
            store.clone(),
            Arc::new(NonceRegistry::default()),
            Arc::new(NullCryptoProvider::new(NetworkId::Mainnet)),
            clock.clone(),
            EngineConfig::default(),
        );
        Harness { engine, store, clock }
    }

    fn signed_request(sk: &SecretKey, domain: &str, ts: u64) -> VerifyRequest {
        let nonce = ChallengeBuilder::generate_nonce();
        let pk = sk.public_key();
        let address = linkgate_crypto::derive_address(&pk, NetworkId::Mainnet).unwrap();
        let message = ChallengeBuilder::build(&Domain::sanitize(domain).unwrap(), Timestamp::from_millis(ts), &nonce);
        VerifyRequest {
            domain: Some(domain.to_string()),
            expected_address: Some(address.as_str().to_string()),
            signing_address: Some(address.as_str().to_string()),
            signature: Some(sk.sign(message.as_bytes()).to_hex()),
            public_key: Some(pk.to_hex()),
            message: Some(message),
            timestamp: Some(ts),
            nonce: Some(nonce),
        }
    }

    fn key(seed: u8) -> SecretKey {
        SecretKey::from_seed(&[seed; 32]).unwrap()
    }

    #[tokio::test]
    async fn missing_fields_do_not_touch_nonces() {
        let h = harness();
        let err = h.engine.verify(VerifyRequest::default()).await.unwrap_err();
        assert!(matches!(err, VerificationError::MissingFields(ref f) if f.len() == 8));
        assert!(h.engine.nonces().is_empty());
    }

    #[tokio::test]
    async fn nonce_that_is_not_64_hex_chars_is_rejected_before_reservation() {
        let h = harness();
        let sk = key(1);
        let malformed = ["n1".to_string(), "g".repeat(64), "a".repeat(63)];
        for nonce in &malformed {
            let mut req = signed_request(&sk, "alice", NOW);
            let message = ChallengeBuilder::build(
                &Domain::sanitize("alice").unwrap(),
                Timestamp::from_millis(NOW),
                nonce,
            );
            req.signature = Some(sk.sign(message.as_bytes()).to_hex());
            req.message = Some(message);
            req.nonce = Some(nonce.clone());
            assert!(matches!(h.engine.verify(req).await, Err(VerificationError::FormatError(_))));
        }
        assert!(h.engine.nonces().is_empty());
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn address_mismatch_rolls_back_nonce() {
        let h = harness();
        let mut req = signed_request(&key(1), "alice", NOW);
        let other = linkgate_crypto::derive_address(&key(2).public_key(), NetworkId::Mainnet).unwrap();
        req.signing_address = Some(other.as_str().to_string());
        assert_eq!(h.engine.verify(req).await.unwrap_err(), VerificationError::AddressMismatch);
        assert!(h.engine.nonces().is_empty());
    }

    #[tokio::test]
    async fn bad_address_format() {
        let h = harness();
        let mut req = signed_request(&key(1), "alice", NOW);
        req.expected_address = Some("txch1notanaddress".into());
        assert!(matches!(
            h.engine.verify(req).await,
            Err(VerificationError::InvalidAddressFormat(_))
        ));
    }

    #[tokio::test]
    async fn future_timestamp_rejected() {
        let h = harness();
        let req = signed_request(&key(1), "alice", NOW + 60_000);
        assert!(matches!(
            h.engine.verify(req).await,
            Err(VerificationError::StaleOrFutureTimestamp { .. })
        ));
    }

    #[tokio::test]
    async fn message_must_match_sanitized_domain() {
        let h = harness();
        let mut req = signed_request(&key(1), "alice", NOW);
        req.domain = Some("bob".into());
        assert_eq!(h.engine.verify(req).await.unwrap_err(), VerificationError::MessageMismatch);
    }

    #[tokio::test]
    async fn malformed_signature_is_format_error() {
        let h = harness();
        let mut req = signed_request(&key(1), "alice", NOW);
        req.signature = Some("zz".into());
        assert!(matches!(h.engine.verify(req).await, Err(VerificationError::FormatError(_))));
        assert!(h.engine.nonces().is_empty());
    }

    #[tokio::test]
    async fn signature_over_other_message_is_invalid() {
        let h = harness();
        let sk = key(1);
        let mut req = signed_request(&sk, "alice", NOW);
        req.signature = Some(sk.sign(b"something else").to_hex());
        assert_eq!(h.engine.verify(req).await.unwrap_err(), VerificationError::InvalidSignature);
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn storage_failure_keeps_nonce_consumed() {
        let h = harness();
        h.store.fail_writes(true);
        let req = signed_request(&key(1), "alice", NOW);
        assert!(matches!(
            h.engine.verify(req.clone()).await,
            Err(VerificationError::StorageFailure(_))
        ));
        assert_eq!(h.engine.nonces().len(), 1);

        h.store.fail_writes(false);
        assert_eq!(h.engine.verify(req).await.unwrap_err(), VerificationError::ReplayDetected);
    }

    #[tokio::test]
    async fn chip0002_encoding() {
        let store = Arc::new(NullVerificationStore::new());
        let engine = VerificationEngine::new(
            store,
            Arc::new(NonceRegistry::default()),
            Arc::new(NullCryptoProvider::new(NetworkId::Mainnet)),
            Arc::new(NullClock::new(NOW)),
            EngineConfig {
                message_encoding: MessageEncoding::Chip0002,
                ..EngineConfig::default()
            },
        );
        let sk = key(3);
        let mut req = signed_request(&sk, "carol", NOW);
        let payload = MessageEncoding::Chip0002.signing_payload(req.message.as_deref().unwrap());
        req.signature = Some(sk.sign(&payload).to_hex());
        assert!(engine.verify(req).await.is_ok());
    }

    #[tokio::test]
    async fn require_verified_checks_address() {
        let h = harness();
        let sk = key(1);
        let record = h.engine.verify(signed_request(&sk, "alice", NOW)).await.unwrap();

        assert!(h.engine.require_verified("alice", None).is_ok());
        assert!(h.engine.require_verified("alice", Some(record.address.as_str())).is_ok());
        assert_eq!(
            h.engine.require_verified("alice", Some("xch1other")).unwrap_err(),
            VerificationError::NotVerified("alice".into())
        );
        assert_eq!(
            h.engine.require_verified("bob", None).unwrap_err(),
            VerificationError::NotVerified("bob".into())
        );
    }

    #[tokio::test]
    async fn sweep_after_ttl_clears_committed_nonce() {
        let h = harness();
        h.engine.verify(signed_request(&key(1), "alice", NOW)).await.unwrap();
        h.clock.advance(crate::DEFAULT_NONCE_TTL_MS);
        assert_eq!(h.engine.nonces().sweep_expired(h.engine.now()), 1);
    }
}
