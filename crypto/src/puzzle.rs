//! Standard wallet puzzle hashing.
//!
//! A wallet address encodes the tree hash of the standard
//! `p2_delegated_puzzle_or_hidden_puzzle` module curried with the wallet's
//! *synthetic* public key:
//!
//! ```text
//! offset        = int(sha256(pk ‖ hidden_puzzle_hash)) mod r   (signed big-endian)
//! synthetic_pk  = pk + G1 · offset
//! puzzle_hash   = curry_tree_hash(MOD_HASH, [atom_hash(synthetic_pk)])
//! ```
//!
//! Tree hashes follow the CLVM rules: an atom hashes as `sha256(0x01 ‖ atom)`
//! and a pair as `sha256(0x02 ‖ left ‖ right)`.

use crate::keys::PublicKey;
use crate::scalar::reduce_signed;
use crate::{sha256_multi, CryptoError};

const fn hex_nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        _ => panic!("invalid hex digit in constant"),
    }
}

const fn hash_from_hex(s: &str) -> [u8; 32] {
    let bytes = s.as_bytes();
    assert!(bytes.len() == 64, "hash constant must be 64 hex digits");
    let mut out = [0u8; 32];
    let mut i = 0;
    while i < 32 {
        out[i] = (hex_nibble(bytes[2 * i]) << 4) | hex_nibble(bytes[2 * i + 1]);
        i += 1;
    }
    out
}

/// Tree hash of the default hidden puzzle (`(=)`), mixed into every synthetic key.
pub const DEFAULT_HIDDEN_PUZZLE_HASH: [u8; 32] =
    hash_from_hex("711d6c4e32c92e53179b199484cf8c897542bc57f2b22582799f9d657eec4699");

/// Tree hash of the uncurried `p2_delegated_puzzle_or_hidden_puzzle` module.
pub const STANDARD_PUZZLE_MOD_HASH: [u8; 32] =
    hash_from_hex("e9aaa49f45bad5c889b86ee3341550c155cfdd10c3a6757de618d20612fffd52");

/// Prefix wallets pair with the message text under CHIP-0002 `signMessage`.
const SIGNED_MESSAGE_PREFIX: &[u8] = b"Chia Signed Message";

// CLVM operator atoms.
const OP_Q: u8 = 0x01;
const OP_A: u8 = 0x02;
const OP_C: u8 = 0x04;

/// Tree hash of an atom.
pub fn atom_hash(atom: &[u8]) -> [u8; 32] {
    sha256_multi(&[&[0x01], atom])
}

/// Tree hash of a cons pair from the tree hashes of its two halves.
pub fn pair_hash(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    sha256_multi(&[&[0x02], &left[..], &right[..]])
}

/// Tree hash of `module` curried with arguments whose tree hashes are given.
///
/// Equivalent to hashing `(a (q . module) (c (q . arg0) (c (q . arg1) … 1)))`
/// without building the program.
pub fn curry_tree_hash(module_hash: &[u8; 32], arg_hashes: &[[u8; 32]]) -> [u8; 32] {
    let nil = atom_hash(&[]);
    let q = atom_hash(&[OP_Q]);
    let a = atom_hash(&[OP_A]);
    let c = atom_hash(&[OP_C]);
    // The environment reference `1` is the same atom as `q`.
    let mut env = q;
    for arg in arg_hashes.iter().rev() {
        let quoted_arg = pair_hash(&q, arg);
        env = pair_hash(&c, &pair_hash(&quoted_arg, &pair_hash(&env, &nil)));
    }
    let quoted_module = pair_hash(&q, module_hash);
    pair_hash(&a, &pair_hash(&quoted_module, &pair_hash(&env, &nil)))
}

/// Compute the synthetic public key for `public_key` and a hidden puzzle.
pub fn synthetic_public_key(
    public_key: &PublicKey,
    hidden_puzzle_hash: &[u8; 32],
) -> Result<PublicKey, CryptoError> {
    let pk = public_key.to_bytes();
    let digest = sha256_multi(&[&pk[..], &hidden_puzzle_hash[..]]);
    public_key.add_scalar_multiple(&reduce_signed(&digest))
}

/// Puzzle hash of the standard wallet puzzle controlled by `public_key`.
pub fn standard_puzzle_hash(public_key: &PublicKey) -> Result<[u8; 32], CryptoError> {
    let synthetic = synthetic_public_key(public_key, &DEFAULT_HIDDEN_PUZZLE_HASH)?;
    let key_hash = atom_hash(&synthetic.to_bytes());
    Ok(curry_tree_hash(&STANDARD_PUZZLE_MOD_HASH, &[key_hash]))
}

/// The 32-byte payload a CHIP-0002 wallet signs for `message`.
pub fn signed_message_hash(message: &[u8]) -> [u8; 32] {
    pair_hash(&atom_hash(SIGNED_MESSAGE_PREFIX), &atom_hash(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::wallet_public_key;
    use crate::keys::SecretKey;
    use crate::sha256;

    /// Master key of the Chia reference vectors for wallet synthetic keys.
    fn reference_master() -> PublicKey {
        let scalar: [u8; 32] =
            hex::decode("6bb19282e27bc6e7e397fb19efc2627a412410fdfd13bf14f4ce5bfdce084c71")
                .unwrap()
                .try_into()
                .unwrap();
        SecretKey::from_scalar(&scalar).unwrap().public_key()
    }

    #[test]
    fn nil_hash_is_hash_of_one_byte() {
        assert_eq!(atom_hash(&[]), sha256(&[0x01]));
        assert_eq!(
            hex::encode(atom_hash(&[])),
            "4bf5122f344554c53bde2ebb8cd2b7e3d1600ad631c385a5d7cce23c7785459a"
        );
    }

    #[test]
    fn synthetic_wallet_public_keys_match_reference() {
        let master = reference_master();
        let expected = [
            "b0c8cf08fdbe7fdb7bb1795740153b944c32364b100c372a05833554cb97794563b096cb5f57bfa09f38d7aebb48704e",
            "8b1b92da63fdf8c4b53349da2fdd84685303587653f1a75826a56a97ea50b86ca8a0fbf6a5d6605c70b6be324bc59c85",
            "a472c01f0b32457aea348ef0493e1d394445df528e0d4139056ba6b4eb57eed593732c830acd897dab502f119d1ae2ff",
            "8b9e4040514e55110cd899b43a5fb8fa6f74e28620f80d20401101f88a77624128c818238073f618b72065a7a7264402",
        ];
        for (index, want) in expected.iter().enumerate() {
            let wallet_key = wallet_public_key(&master, index as u32).unwrap();
            let synthetic = synthetic_public_key(&wallet_key, &DEFAULT_HIDDEN_PUZZLE_HASH).unwrap();
            assert_eq!(synthetic.to_hex(), *want, "index {index}");
        }
    }

    #[test]
    fn standard_puzzle_hash_of_reference_wallet() {
        let master = reference_master();
        let expected = [
            "2802277b2573e049e71f30d7d912821ebab1305d2d6bf3a73700c057c6b6864f",
            "f5499b326f3e2ac408b29e6debbcea9ef3e3f770392a46b94bfd2e98678f3e64",
        ];
        for (index, want) in expected.iter().enumerate() {
            let wallet_key = wallet_public_key(&master, index as u32).unwrap();
            assert_eq!(hex::encode(standard_puzzle_hash(&wallet_key).unwrap()), *want);
        }
    }

    #[test]
    fn signed_message_hash_known_answer() {
        assert_eq!(
            hex::encode(signed_message_hash(b"hello")),
            "a58695a4fe01f0779c51ce56dba718a18df326086b0c259b554b12aa53532926"
        );
    }

    #[test]
    fn constants_decode() {
        assert_eq!(DEFAULT_HIDDEN_PUZZLE_HASH[0], 0x71);
        assert_eq!(DEFAULT_HIDDEN_PUZZLE_HASH[31], 0x99);
        assert_eq!(STANDARD_PUZZLE_MOD_HASH[0], 0xe9);
        assert_eq!(STANDARD_PUZZLE_MOD_HASH[31], 0x52);
    }

    #[test]
    fn curry_without_args_wraps_module() {
        let module = [9u8; 32];
        let q = atom_hash(&[OP_Q]);
        let nil = atom_hash(&[]);
        let expected = pair_hash(
            &atom_hash(&[OP_A]),
            &pair_hash(&pair_hash(&q, &module), &pair_hash(&q, &nil)),
        );
        assert_eq!(curry_tree_hash(&module, &[]), expected);
    }

    #[test]
    fn curry_depends_on_argument_order() {
        let module = [1u8; 32];
        let x = atom_hash(b"x");
        let y = atom_hash(b"y");
        assert_ne!(
            curry_tree_hash(&module, &[x, y]),
            curry_tree_hash(&module, &[y, x])
        );
    }

    #[test]
    fn synthetic_key_matches_synthetic_secret() {
        let sk = SecretKey::from_seed(&[3u8; 32]).unwrap();
        let synthetic_pk = synthetic_public_key(&sk.public_key(), &DEFAULT_HIDDEN_PUZZLE_HASH).unwrap();
        let synthetic_sk = sk.synthetic(&DEFAULT_HIDDEN_PUZZLE_HASH).unwrap();
        assert_eq!(synthetic_sk.public_key(), synthetic_pk);
        assert_ne!(synthetic_pk, sk.public_key());
    }

    #[test]
    fn puzzle_hash_is_deterministic_and_key_specific() {
        let a = SecretKey::from_seed(&[4u8; 32]).unwrap().public_key();
        let b = SecretKey::from_seed(&[5u8; 32]).unwrap().public_key();
        assert_eq!(standard_puzzle_hash(&a).unwrap(), standard_puzzle_hash(&a).unwrap());
        assert_ne!(standard_puzzle_hash(&a).unwrap(), standard_puzzle_hash(&b).unwrap());
    }
}
