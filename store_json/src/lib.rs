//! Flat JSON file storage backend for linkgate.
//!
//! The whole store is one JSON object keyed by domain:
//!
//! ```json
//! { "alice": { "domain": "alice", "address": "xch1…", "verified": true, … } }
//! ```
//!
//! The file is loaded fully at open and rewritten on every mutation
//! (write to a sibling temp file, then rename over the original).

pub mod error;
pub mod store;

pub use error::JsonStoreError;
pub use store::JsonFileStore;
