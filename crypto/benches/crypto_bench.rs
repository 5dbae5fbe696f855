use criterion::{black_box, criterion_group, criterion_main, Criterion};

use linkgate_crypto::{CryptoProvider, BlsCryptoProvider, SecretKey};
use linkgate_types::NetworkId;

fn bls_verify_bench(c: &mut Criterion) {
    let sk = SecretKey::from_seed(&[7u8; 32]).unwrap();
    let pk = sk.public_key();
    let msg = b"Verify ownership of domain alice at 1700000000000 with nonce 00";
    let sig = sk.sign(msg);

    c.bench_function("bls_aug_verify", |b| {
        b.iter(|| linkgate_crypto::verify_signature(black_box(msg), &sig, &pk))
    });
}

fn parse_public_key_bench(c: &mut Criterion) {
    let hex = SecretKey::from_seed(&[8u8; 32]).unwrap().public_key().to_hex();

    c.bench_function("parse_public_key_hex", |b| {
        b.iter(|| linkgate_crypto::PublicKey::from_hex(black_box(&hex)))
    });
}

fn derive_address_bench(c: &mut Criterion) {
    let provider = BlsCryptoProvider::new(NetworkId::Mainnet);
    let pk = SecretKey::from_seed(&[9u8; 32]).unwrap().public_key();

    c.bench_function("derive_address", |b| {
        b.iter(|| provider.derive_address(black_box(&pk)))
    });
}

fn decode_address_bench(c: &mut Criterion) {
    let addr = linkgate_crypto::encode_puzzle_hash(&[0x5a; 32], "xch");

    c.bench_function("decode_address_bech32m", |b| {
        b.iter(|| linkgate_crypto::decode_address(black_box(&addr)))
    });
}

criterion_group!(
    benches,
    bls_verify_bench,
    parse_public_key_bench,
    derive_address_bench,
    decode_address_bench,
);
criterion_main!(benches);
