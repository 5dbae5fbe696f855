#![no_main]

use libfuzzer_sys::fuzz_target;

use linkgate_crypto::{BlsCryptoProvider, CryptoProvider, PublicKey, Signature};

fuzz_target!(|data: &[u8]| {
    // Raw bytes: must never panic, only reject.
    let _ = PublicKey::from_bytes(data);
    let _ = Signature::from_bytes(data);

    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let provider = BlsCryptoProvider::default();
    if let Ok(pk) = provider.parse_public_key(s) {
        assert_eq!(PublicKey::from_hex(&pk.to_hex()).map(|k| k.to_bytes()).ok(), Some(pk.to_bytes()));
        let _ = provider.derive_address(&pk);
    }
    let _ = provider.parse_signature(s);
});
