//! The narrow crypto seam the verification engine depends on.

use linkgate_types::{ChainAddress, NetworkId};

use crate::keys::{PublicKey, SecretKey, Signature};
use crate::sign::{verify_signature, MessageEncoding};
use crate::CryptoError;

/// Seed of the key the self-test signs with. Not a secret.
const SELF_TEST_SEED: [u8; 32] = [0x42; 32];
const SELF_TEST_MESSAGE: &str = "linkgate crypto self-test";

/// Everything the engine needs from the signature library.
pub trait CryptoProvider: Send + Sync {
    /// Network whose address prefix [`CryptoProvider::derive_address`] uses.
    fn network(&self) -> NetworkId;

    fn parse_public_key(&self, hex: &str) -> Result<PublicKey, CryptoError>;

    fn parse_signature(&self, hex: &str) -> Result<Signature, CryptoError>;

    /// `false` on any mismatch; never errors for parsed inputs.
    fn verify(&self, message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool;

    fn derive_address(&self, public_key: &PublicKey) -> Result<ChainAddress, CryptoError>;

    /// The bytes a wallet signs for `message` under `encoding`.
    fn signing_payload(&self, encoding: MessageEncoding, message: &str) -> Vec<u8> {
        encoding.signing_payload(message)
    }

    /// Exercise sign, verify and derive once; a failure means the library is unusable.
    fn self_test(&self) -> Result<(), CryptoError>;
}

/// [`CryptoProvider`] backed by `blst`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlsCryptoProvider {
    network: NetworkId,
}

impl BlsCryptoProvider {
    pub fn new(network: NetworkId) -> Self {
        Self { network }
    }
}

impl CryptoProvider for BlsCryptoProvider {
    fn network(&self) -> NetworkId {
        self.network
    }

    fn parse_public_key(&self, hex: &str) -> Result<PublicKey, CryptoError> {
        PublicKey::from_hex(hex)
    }

    fn parse_signature(&self, hex: &str) -> Result<Signature, CryptoError> {
        Signature::from_hex(hex)
    }

    fn verify(&self, message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
        verify_signature(message, signature, public_key)
    }

    fn derive_address(&self, public_key: &PublicKey) -> Result<ChainAddress, CryptoError> {
        crate::address::derive_address(public_key, self.network)
    }

    fn self_test(&self) -> Result<(), CryptoError> {
        let sk = SecretKey::from_seed(&SELF_TEST_SEED)?;
        let pk = sk.public_key();
        let message = SELF_TEST_MESSAGE.as_bytes();
        let signature = sk.sign(message);

        let reparsed_pk = self.parse_public_key(&pk.to_hex())?;
        let reparsed_sig = self.parse_signature(&signature.to_hex())?;
        if !self.verify(message, &reparsed_sig, &reparsed_pk) {
            return Err(CryptoError::SelfTest("signature did not verify".into()));
        }
        if self.verify(b"tampered", &reparsed_sig, &reparsed_pk) {
            return Err(CryptoError::SelfTest("tampered message verified".into()));
        }

        let first = self.derive_address(&pk)?;
        let second = self.derive_address(&reparsed_pk)?;
        if first != second || !crate::validate_address(first.as_str(), self.network) {
            return Err(CryptoError::SelfTest("address derivation is unstable".into()));
        }
        Ok(())
    }
}
