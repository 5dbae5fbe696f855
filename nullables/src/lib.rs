//! Nullable infrastructure for deterministic testing.
//!
//! The external dependencies of the engine (clock, storage, crypto library)
//! sit behind traits. This crate provides test-friendly implementations that
//! return deterministic values, can be steered programmatically, and never
//! touch the filesystem.
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod crypto;
pub mod store;

pub use clock::NullClock;
pub use crypto::NullCryptoProvider;
pub use store::NullVerificationStore;
