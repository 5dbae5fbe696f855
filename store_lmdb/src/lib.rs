//! LMDB storage backend for linkgate.
//!
//! Implements [`linkgate_store::VerificationStore`] on top of `heed`. One
//! environment holds two named databases: `verifications` (domain → bincode
//! record) and `meta` (schema bookkeeping).

pub mod environment;
pub mod error;
pub mod meta;
pub mod verification;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use verification::LmdbVerificationStore;
