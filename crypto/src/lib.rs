//! Cryptographic primitives for linkgate.
//!
//! - **BLS12-381** (`blst`, min-pk variant) with the augmented signature
//!   scheme used by chain wallets: 48-byte G1 public keys, 96-byte G2 signatures
//! - **SHA-256** tree hashing of the standard wallet puzzle
//! - Address derivation: synthetic key → puzzle hash → bech32m with the
//!   network prefix (`xch1…`)
//!
//! The rest of the workspace talks to this crate through [`CryptoProvider`].

pub mod address;
pub mod derivation;
pub mod error;
pub mod hash;
pub mod keys;
pub mod provider;
pub mod puzzle;
mod scalar;
pub mod sign;

pub use address::{decode_address, derive_address, encode_puzzle_hash, validate_address};
pub use derivation::{derive_child_public_key, derive_path, wallet_public_key, WALLET_OBSERVER_PATH};
pub use error::CryptoError;
pub use hash::{sha256, sha256_multi};
pub use keys::{PublicKey, SecretKey, Signature, PUBLIC_KEY_LEN, SIGNATURE_LEN};
pub use provider::{BlsCryptoProvider, CryptoProvider};
pub use puzzle::{standard_puzzle_hash, synthetic_public_key, DEFAULT_HIDDEN_PUZZLE_HASH};
pub use sign::{sign_message, verify_signature, MessageEncoding};
