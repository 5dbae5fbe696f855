//! Domain ownership verification.
//!
//! A client proves control of a chain address for a domain in three steps:
//! 1. **Challenge**: obtain the canonical message binding domain, timestamp and
//!    a fresh nonce ([`ChallengeBuilder`]).
//! 2. **Sign**: have the wallet sign that exact message.
//! 3. **Verify**: submit signature, public key and claimed address. The
//!    [`VerificationEngine`] runs every gate (nonce replay, address format,
//!    freshness, message reconstruction, key-to-address binding, signature)
//!    and persists a record on success.
//!
//! Records can then be queried, required by other write paths, and revoked.

pub mod challenge;
pub mod engine;
pub mod error;
pub mod gate;
pub mod nonce;
pub mod request;
pub mod sweeper;

pub use challenge::{ChallengeBuilder, FreshnessWindow, VerificationChallenge};
pub use engine::{EngineConfig, RevokeOutcome, VerificationEngine};
pub use error::VerificationError;
pub use gate::CryptoGate;
pub use nonce::{NonceRegistry, DEFAULT_NONCE_TTL_MS};
pub use request::{RevokeRequest, VerifyRequest};
pub use sweeper::spawn_nonce_sweeper;
