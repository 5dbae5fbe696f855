//! Abstract storage for verification records.
//!
//! Every backend (LMDB, JSON file, in-memory for testing) implements
//! [`VerificationStore`]. The engine and the HTTP surface depend only on the
//! trait.

pub mod error;
pub mod verification;

pub use error::StoreError;
pub use verification::VerificationStore;
