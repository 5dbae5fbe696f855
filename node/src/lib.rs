//! linkgate service node. Wires storage, the verification engine, the nonce
//! sweeper and the HTTP server together.
//!
//! The node owns process-level concerns:
//! - Configuration (TOML file + CLI overrides)
//! - Structured logging
//! - Opening the configured storage backend
//! - Graceful shutdown on SIGINT/SIGTERM

pub mod config;
pub mod error;
pub mod logging;
pub mod node;
pub mod shutdown;

pub use config::{NodeConfig, RevocationConfig, StorageBackend, VerificationConfig};
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use node::{open_store, LinkgateNode};
pub use shutdown::ShutdownController;
