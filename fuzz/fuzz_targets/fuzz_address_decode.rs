#![no_main]

use libfuzzer_sys::fuzz_target;

use linkgate_crypto::{decode_address, encode_puzzle_hash, validate_address};
use linkgate_types::{ChainAddress, NetworkId};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // A successful decode must re-encode to the same (lowercased) string.
    if let Ok((prefix, puzzle_hash)) = decode_address(s) {
        assert_eq!(encode_puzzle_hash(&puzzle_hash, &prefix), s.to_ascii_lowercase());
    }

    // A checksum-valid lowercase mainnet address always passes the format gate.
    if validate_address(s, NetworkId::Mainnet) && !s.bytes().any(|b| b.is_ascii_uppercase()) {
        assert!(ChainAddress::parse(s, NetworkId::Mainnet).is_ok());
    }
});
