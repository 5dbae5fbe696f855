//! BLS12-381 key and signature types.
//!
//! Public keys are compressed G1 points (48 bytes, 96 hex chars) and
//! signatures are compressed G2 points (96 bytes, 192 hex chars), which is
//! `blst`'s `min_pk` variant.

use std::fmt;

use blst::min_pk;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::scalar::{add_mod_order, reduce_signed, reduce_unsigned};
use crate::sign::AUG_SCHEME_DST;
use crate::CryptoError;

/// Compressed public key length in bytes.
pub const PUBLIC_KEY_LEN: usize = 48;
/// Compressed signature length in bytes.
pub const SIGNATURE_LEN: usize = 96;

/// A validated BLS public key (G1, subgroup-checked, not the identity).
#[derive(Clone)]
pub struct PublicKey(pub(crate) min_pk::PublicKey);

/// A BLS signature (G2) that decoded to a curve point.
#[derive(Clone)]
pub struct Signature(pub(crate) min_pk::Signature);

/// A BLS secret key.
///
/// Only used for developer signing and self-tests; the service never holds
/// user keys.
pub struct SecretKey(min_pk::SecretKey);

/// Strip an optional `0x` prefix, check the exact length and decode hex.
fn decode_fixed_hex(raw: &str, byte_len: usize, what: &str) -> Result<Vec<u8>, CryptoError> {
    let s = raw.strip_prefix("0x").unwrap_or(raw);
    if s.len() != byte_len * 2 {
        return Err(CryptoError::Format(format!(
            "{what} must be {} hex characters, got {}",
            byte_len * 2,
            s.len()
        )));
    }
    hex::decode(s).map_err(|e| CryptoError::Format(format!("{what} is not valid hex: {e}")))
}

impl PublicKey {
    /// Decode and validate a compressed G1 point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != PUBLIC_KEY_LEN {
            return Err(CryptoError::Format(format!(
                "public key must be {PUBLIC_KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        min_pk::PublicKey::key_validate(bytes)
            .map(Self)
            .map_err(|e| CryptoError::Format(format!("public key is not a valid G1 point: {e:?}")))
    }

    /// Parse a 96-character hex public key.
    pub fn from_hex(raw: &str) -> Result<Self, CryptoError> {
        let bytes = decode_fixed_hex(raw, PUBLIC_KEY_LEN, "public key")?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.0.to_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// `self + G1 * scalar`, with `scalar` a reduced big-endian value.
    pub(crate) fn add_scalar_multiple(&self, scalar: &[u8; 32]) -> Result<Self, CryptoError> {
        if scalar.iter().all(|b| *b == 0) {
            return Ok(self.clone());
        }
        let offset = min_pk::SecretKey::from_bytes(scalar)
            .map_err(|e| CryptoError::Derivation(format!("offset scalar rejected: {e:?}")))?
            .sk_to_pk();
        let sum = min_pk::AggregatePublicKey::aggregate(&[&self.0, &offset], false)
            .map_err(|e| CryptoError::Derivation(format!("point addition failed: {e:?}")))?;
        Ok(Self(sum.to_public_key()))
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PublicKey {}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl Signature {
    /// Decode a compressed G2 point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SIGNATURE_LEN {
            return Err(CryptoError::Format(format!(
                "signature must be {SIGNATURE_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        min_pk::Signature::from_bytes(bytes)
            .map(Self)
            .map_err(|e| CryptoError::Format(format!("signature is not a valid G2 point: {e:?}")))
    }

    /// Parse a 192-character hex signature.
    pub fn from_hex(raw: &str) -> Result<Self, CryptoError> {
        let bytes = decode_fixed_hex(raw, SIGNATURE_LEN, "signature")?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        self.0.to_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for Signature {}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}…)", &self.to_hex()[..16])
    }
}

impl SecretKey {
    /// Derive a key from at least 32 bytes of seed material (IETF KeyGen).
    pub fn from_seed(seed: &[u8]) -> Result<Self, CryptoError> {
        min_pk::SecretKey::key_gen(seed, &[])
            .map(Self)
            .map_err(|e| CryptoError::Derivation(format!("key generation failed: {e:?}")))
    }

    /// Generate a key from the OS random source.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut ikm = Zeroizing::new([0u8; 32]);
        OsRng.fill_bytes(&mut *ikm);
        Self::from_seed(&*ikm)
    }

    pub(crate) fn from_scalar(scalar: &[u8; 32]) -> Result<Self, CryptoError> {
        min_pk::SecretKey::from_bytes(scalar)
            .map(Self)
            .map_err(|e| CryptoError::Derivation(format!("scalar is not a valid secret key: {e:?}")))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.sk_to_pk())
    }

    /// Sign with the augmented scheme: the public key is prepended to the
    /// message before hashing to G2.
    pub fn sign(&self, message: &[u8]) -> Signature {
        let aug = self.public_key().to_bytes();
        Signature(self.0.sign(message, AUG_SCHEME_DST, &aug))
    }

    /// Unhardened child derivation; the matching public key is
    /// [`crate::derive_child_public_key`].
    pub fn derive_child_unhardened(&self, index: u32) -> Result<Self, CryptoError> {
        let parent_pk = self.public_key().to_bytes();
        let digest = crate::sha256_multi(&[&parent_pk[..], &index.to_be_bytes()[..]]);
        let offset = reduce_unsigned(&digest);
        let sk = Zeroizing::new(self.0.to_bytes());
        Self::from_scalar(&add_mod_order(&sk, &offset))
    }

    /// The secret key behind [`crate::synthetic_public_key`].
    pub fn synthetic(&self, hidden_puzzle_hash: &[u8; 32]) -> Result<Self, CryptoError> {
        let pk = self.public_key().to_bytes();
        let digest = crate::sha256_multi(&[&pk[..], &hidden_puzzle_hash[..]]);
        let offset = reduce_signed(&digest);
        let sk = Zeroizing::new(self.0.to_bytes());
        Self::from_scalar(&add_mod_order(&sk, &offset))
    }
}
