//! BLS message signing and verification (augmented scheme).

use blst::BLST_ERROR;
use serde::{Deserialize, Serialize};

use crate::keys::{PublicKey, SecretKey, Signature};
use crate::puzzle;

/// Domain separation tag of the augmented ("AUG") BLS scheme wallets sign with.
pub const AUG_SCHEME_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_AUG_";

/// How the challenge text is turned into the bytes the wallet signed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageEncoding {
    /// The UTF-8 bytes of the message itself.
    #[default]
    Raw,
    /// CHIP-0002 `signMessage`: the tree hash of `("Chia Signed Message" . message)`.
    Chip0002,
}

impl MessageEncoding {
    pub fn signing_payload(&self, message: &str) -> Vec<u8> {
        match self {
            Self::Raw => message.as_bytes().to_vec(),
            Self::Chip0002 => puzzle::signed_message_hash(message.as_bytes()).to_vec(),
        }
    }
}

/// Sign a message with a secret key, returning the signature.
pub fn sign_message(message: &[u8], secret_key: &SecretKey) -> Signature {
    secret_key.sign(message)
}

/// Verify a signature against a message and public key.
///
/// Returns `true` if the signature is valid, `false` otherwise. The signature
/// is subgroup-checked as part of verification.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let aug = public_key.to_bytes();
    let result = signature
        .0
        .verify(true, message, AUG_SCHEME_DST, &aug, &public_key.0, false);
    result == BLST_ERROR::BLST_SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keypair() -> (SecretKey, PublicKey) {
        let sk = SecretKey::generate().unwrap();
        let pk = sk.public_key();
        (sk, pk)
    }

    #[test]
    fn sign_and_verify() {
        let (sk, pk) = keypair();
        let msg = b"Verify ownership of domain alice at 1 with nonce 00";
        let sig = sign_message(msg, &sk);
        assert!(verify_signature(msg, &sig, &pk));
    }

    #[test]
    fn wrong_message_fails() {
        let (sk, pk) = keypair();
        let sig = sign_message(b"correct message", &sk);
        assert!(!verify_signature(b"wrong message", &sig, &pk));
    }

    #[test]
    fn wrong_key_fails() {
        let (sk1, _) = keypair();
        let (_, pk2) = keypair();
        let sig = sign_message(b"test", &sk1);
        assert!(!verify_signature(b"test", &sig, &pk2));
    }

    #[test]
    fn signature_deterministic() {
        let sk = SecretKey::from_seed(&[99u8; 32]).unwrap();
        let sig1 = sign_message(b"deterministic test", &sk);
        let sig2 = sign_message(b"deterministic test", &sk);
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn empty_message() {
        let (sk, pk) = keypair();
        let sig = sign_message(b"", &sk);
        assert!(verify_signature(b"", &sig, &pk));
    }

    #[test]
    fn chip0002_payload_differs_from_raw() {
        let raw = MessageEncoding::Raw.signing_payload("hello");
        let chip = MessageEncoding::Chip0002.signing_payload("hello");
        assert_eq!(raw, b"hello");
        assert_eq!(chip.len(), 32);
        assert_ne!(raw, chip);
        assert_eq!(
            hex::encode(chip),
            "a58695a4fe01f0779c51ce56dba718a18df326086b0c259b554b12aa53532926"
        );
    }

    #[test]
    fn encoding_serde_names() {
        let json = serde_json::to_string(&MessageEncoding::Chip0002).unwrap();
        assert_eq!(json, "\"chip0002\"");
    }
}
