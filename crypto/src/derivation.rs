//! Unhardened public-key derivation.
//!
//! Lets the service (or an operator tool) walk from a wallet's master public
//! key to the observer keys that back its receive addresses, without any
//! secret material.

use crate::keys::PublicKey;
use crate::scalar::reduce_unsigned;
use crate::{sha256_multi, CryptoError};

/// Observer path prefix of standard wallet receive keys: purpose 12381,
/// coin type 8444, key type 2 (wallet). The address index follows.
pub const WALLET_OBSERVER_PATH: [u32; 3] = [12381, 8444, 2];

/// `child = parent + G1 · (sha256(parent ‖ index_be32) mod r)`.
pub fn derive_child_public_key(parent: &PublicKey, index: u32) -> Result<PublicKey, CryptoError> {
    let parent_bytes = parent.to_bytes();
    let digest = sha256_multi(&[&parent_bytes[..], &index.to_be_bytes()[..]]);
    parent.add_scalar_multiple(&reduce_unsigned(&digest))
}

/// Apply [`derive_child_public_key`] along `path`.
pub fn derive_path(master: &PublicKey, path: &[u32]) -> Result<PublicKey, CryptoError> {
    path.iter()
        .try_fold(master.clone(), |key, index| derive_child_public_key(&key, *index))
}

/// The observer key for receive address `index` of the wallet rooted at `master`.
pub fn wallet_public_key(master: &PublicKey, index: u32) -> Result<PublicKey, CryptoError> {
    let wallet_root = derive_path(master, &WALLET_OBSERVER_PATH)?;
    derive_child_public_key(&wallet_root, index)
}
