//! Fundamental types for linkgate.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! sanitized domains, chain addresses, network identifiers, millisecond
//! timestamps and the persisted verification record.

pub mod address;
pub mod domain;
pub mod error;
pub mod network;
pub mod record;
pub mod time;

pub use address::ChainAddress;
pub use domain::Domain;
pub use error::TypeError;
pub use network::NetworkId;
pub use record::VerificationRecord;
pub use time::{Clock, SystemClock, Timestamp};
