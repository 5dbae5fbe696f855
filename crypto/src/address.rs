//! Chain address encoding.
//!
//! Address format: `<prefix>1` + bech32m(puzzle_hash), where `prefix` is the
//! network's human-readable part. A 32-byte puzzle hash packs into 52 five-bit
//! groups, followed by a 6-group bech32m checksum, so a mainnet address is
//! `3 + 1 + 52 + 6 = 62` characters.

use linkgate_types::address::BECH32_CHARSET;
use linkgate_types::{ChainAddress, NetworkId};

use crate::keys::PublicKey;
use crate::puzzle::standard_puzzle_hash;
use crate::CryptoError;

const CHARSET: &[u8] = BECH32_CHARSET.as_bytes();

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const CHARSET_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let mut i = 0;
    while i < 32 {
        table[CHARSET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Final xor constant of the bech32m checksum (BIP-350).
const BECH32M_CONST: u32 = 0x2bc8_30a3;
const GENERATOR: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];
const CHECKSUM_LEN: usize = 6;

fn polymod(values: &[u8]) -> u32 {
    let mut chk: u32 = 1;
    for &v in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(v);
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> Vec<u8> {
    let bytes = hrp.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() * 2 + 1);
    out.extend(bytes.iter().map(|b| b >> 5));
    out.push(0);
    out.extend(bytes.iter().map(|b| b & 0x1f));
    out
}

fn create_checksum(hrp: &str, data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0u8; CHECKSUM_LEN]);
    let pm = polymod(&values) ^ BECH32M_CONST;
    let mut out = [0u8; CHECKSUM_LEN];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = ((pm >> (5 * (5 - i))) & 0x1f) as u8;
    }
    out
}

fn verify_checksum(hrp: &str, data: &[u8]) -> bool {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    polymod(&values) == BECH32M_CONST
}

/// Regroup a bit stream from `from`-bit words into `to`-bit words.
fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Option<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max_value: u32 = (1 << to) - 1;
    let max_acc: u32 = (1 << (from + to - 1)) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
    for &value in data {
        let v = u32::from(value);
        if v >> from != 0 {
            return None;
        }
        acc = ((acc << from) | v) & max_acc;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max_value) as u8);
        }
    }
    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max_value) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max_value) != 0 {
        return None;
    }
    Some(out)
}

/// Encode a 32-byte puzzle hash as a bech32m address with the given prefix.
pub fn encode_puzzle_hash(puzzle_hash: &[u8; 32], prefix: &str) -> String {
    // 8 → 5 with padding cannot fail for byte input.
    let data = convert_bits(puzzle_hash, 8, 5, true).unwrap_or_default();
    let checksum = create_checksum(prefix, &data);
    let mut out = String::with_capacity(prefix.len() + 1 + data.len() + CHECKSUM_LEN);
    out.push_str(prefix);
    out.push('1');
    for d in data.iter().chain(checksum.iter()) {
        out.push(CHARSET[*d as usize] as char);
    }
    out
}

/// Decode a bech32m address into its prefix and 32-byte puzzle hash.
///
/// Mixed-case input is rejected; an all-uppercase address is accepted.
pub fn decode_address(address: &str) -> Result<(String, [u8; 32]), CryptoError> {
    let has_lower = address.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = address.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(CryptoError::Address("mixed-case address".into()));
    }
    let lowered = address.to_ascii_lowercase();
    let sep = lowered
        .rfind('1')
        .ok_or_else(|| CryptoError::Address("missing separator".into()))?;
    let (hrp, rest) = lowered.split_at(sep);
    let encoded = &rest[1..];
    if hrp.is_empty() || encoded.len() < CHECKSUM_LEN {
        return Err(CryptoError::Address("address too short".into()));
    }

    let mut data = Vec::with_capacity(encoded.len());
    for c in encoded.bytes() {
        let v = if c < 128 { CHARSET_DECODE[c as usize] } else { 0xFF };
        if v == 0xFF {
            return Err(CryptoError::Address(format!(
                "invalid character {:?}",
                c as char
            )));
        }
        data.push(v);
    }
    if !verify_checksum(hrp, &data) {
        return Err(CryptoError::Address("checksum mismatch".into()));
    }

    let payload = &data[..data.len() - CHECKSUM_LEN];
    let bytes = convert_bits(payload, 5, 8, false)
        .ok_or_else(|| CryptoError::Address("invalid padding".into()))?;
    let puzzle_hash: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
        CryptoError::Address(format!("payload is {} bytes, expected 32", bytes.len()))
    })?;
    Ok((hrp.to_string(), puzzle_hash))
}

/// Derive the standard wallet address for `public_key` on `network`.
pub fn derive_address(public_key: &PublicKey, network: NetworkId) -> Result<ChainAddress, CryptoError> {
    let puzzle_hash = standard_puzzle_hash(public_key)?;
    Ok(ChainAddress::from_encoded(encode_puzzle_hash(
        &puzzle_hash,
        network.address_prefix(),
    )))
}

/// Whether `address` is a checksum-valid address for `network`.
pub fn validate_address(address: &str, network: NetworkId) -> bool {
    matches!(decode_address(address), Ok((hrp, _)) if hrp == network.address_prefix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SecretKey;
    use linkgate_types::address::matches_pattern;

    fn sample_pk(seed: u8) -> PublicKey {
        SecretKey::from_seed(&[seed; 32]).unwrap().public_key()
    }

    #[test]
    fn encode_decode_roundtrip() {
        let ph = [0x5au8; 32];
        let addr = encode_puzzle_hash(&ph, "xch");
        assert_eq!(addr.len(), 62);
        let (hrp, decoded) = decode_address(&addr).unwrap();
        assert_eq!(hrp, "xch");
        assert_eq!(decoded, ph);
    }

    #[test]
    fn zero_hash_encodes_to_all_q() {
        let addr = encode_puzzle_hash(&[0u8; 32], "xch");
        assert!(addr[4..56].chars().all(|c| c == 'q'));
        assert_eq!(addr, "xch1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq2u30kz");
    }

    #[test]
    fn bip350_valid_checksums() {
        for s in [
            "a1lqfn3a",
            "abcdef1l7aum6echk45nj3s0wdvt2fg8x9yrzpqzd3ryx",
            "split1checkupstagehandshakeupstreamerranterredcaperredlc445v",
            "?1v759aa",
        ] {
            let (hrp, data) = s.rsplit_once('1').unwrap();
            let values: Vec<u8> = data.bytes().map(|b| CHARSET_DECODE[b as usize]).collect();
            assert!(verify_checksum(hrp, &values), "{s}");
        }
    }

    #[test]
    fn reference_wallet_addresses() {
        let scalar: [u8; 32] =
            hex::decode("6bb19282e27bc6e7e397fb19efc2627a412410fdfd13bf14f4ce5bfdce084c71")
                .unwrap()
                .try_into()
                .unwrap();
        let master = SecretKey::from_scalar(&scalar).unwrap().public_key();
        let first = crate::derivation::wallet_public_key(&master, 0).unwrap();
        let second = crate::derivation::wallet_public_key(&master, 1).unwrap();

        assert_eq!(
            derive_address(&first, NetworkId::Mainnet).unwrap().as_str(),
            "xch19qpzw7e9w0syneclxrtajy5zr6atzvza944l8fehqrq9034kse8sqtj57e"
        );
        assert_eq!(
            derive_address(&first, NetworkId::Testnet).unwrap().as_str(),
            "txch19qpzw7e9w0syneclxrtajy5zr6atzvza944l8fehqrq9034kse8sdv4zl2"
        );
        assert_eq!(
            derive_address(&second, NetworkId::Mainnet).unwrap().as_str(),
            "xch174yekvn08c4vgz9jnek7h082nme78ams8y4ydw2tl5hfseu08ejq0xjr5q"
        );
    }

    #[test]
    fn derived_address_matches_pattern() {
        let addr = derive_address(&sample_pk(1), NetworkId::Mainnet).unwrap();
        assert!(matches_pattern(addr.as_str(), NetworkId::Mainnet));
        assert!(validate_address(addr.as_str(), NetworkId::Mainnet));
        assert!(!validate_address(addr.as_str(), NetworkId::Testnet));
    }

    #[test]
    fn testnet_prefix() {
        let addr = derive_address(&sample_pk(1), NetworkId::Testnet).unwrap();
        assert!(addr.as_str().starts_with("txch1"));
        assert_eq!(addr.as_str().len(), 63);
    }

    #[test]
    fn derivation_is_deterministic_and_key_specific() {
        let a1 = derive_address(&sample_pk(1), NetworkId::Mainnet).unwrap();
        let a2 = derive_address(&sample_pk(1), NetworkId::Mainnet).unwrap();
        let b = derive_address(&sample_pk(2), NetworkId::Mainnet).unwrap();
        assert_eq!(a1, a2);
        assert_ne!(a1, b);
    }

    #[test]
    fn single_char_corruption_detected() {
        let addr = encode_puzzle_hash(&[7u8; 32], "xch");
        let mut chars: Vec<char> = addr.chars().collect();
        chars[20] = if chars[20] == 'q' { 'p' } else { 'q' };
        let corrupted: String = chars.into_iter().collect();
        assert!(matches!(decode_address(&corrupted), Err(CryptoError::Address(_))));
    }

    #[test]
    fn uppercase_accepted_mixed_case_rejected() {
        let addr = encode_puzzle_hash(&[9u8; 32], "xch");
        assert!(decode_address(&addr.to_ascii_uppercase()).is_ok());
        let mut mixed = addr.clone();
        mixed.replace_range(0..1, "X");
        assert!(decode_address(&mixed).is_err());
    }

    #[test]
    fn garbage_rejected() {
        assert!(decode_address("").is_err());
        assert!(decode_address("xch").is_err());
        assert!(decode_address("xch1bbbbbb").is_err());
    }
}
