//! Nullable crypto provider: the real BLS provider with a switchable self-test.

use linkgate_crypto::{BlsCryptoProvider, CryptoError, CryptoProvider, PublicKey, Signature};
use linkgate_types::{ChainAddress, NetworkId};

/// Delegates to [`BlsCryptoProvider`], except that [`NullCryptoProvider::unavailable`]
/// fails its self-test, simulating a crypto library that never initializes.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullCryptoProvider {
    inner: BlsCryptoProvider,
    broken: bool,
}

impl NullCryptoProvider {
    pub fn new(network: NetworkId) -> Self {
        Self {
            inner: BlsCryptoProvider::new(network),
            broken: false,
        }
    }

    pub fn unavailable(network: NetworkId) -> Self {
        Self {
            inner: BlsCryptoProvider::new(network),
            broken: true,
        }
    }
}

impl CryptoProvider for NullCryptoProvider {
    fn network(&self) -> NetworkId {
        self.inner.network()
    }

    fn parse_public_key(&self, hex: &str) -> Result<PublicKey, CryptoError> {
        self.inner.parse_public_key(hex)
    }

    fn parse_signature(&self, hex: &str) -> Result<Signature, CryptoError> {
        self.inner.parse_signature(hex)
    }

    fn verify(&self, message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
        self.inner.verify(message, signature, public_key)
    }

    fn derive_address(&self, public_key: &PublicKey) -> Result<ChainAddress, CryptoError> {
        self.inner.derive_address(public_key)
    }

    fn self_test(&self) -> Result<(), CryptoError> {
        if self.broken {
            return Err(CryptoError::SelfTest("crypto library unavailable".into()));
        }
        self.inner.self_test()
    }
}
