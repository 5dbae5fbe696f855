//! HTTP JSON API for linkgate.
//!
//! Endpoints:
//! - `POST /verify`: submit an ownership proof
//! - `GET /verify?domain=`: verification status
//! - `DELETE /verify?domain=`: revoke (signed body unless disabled)
//! - `GET /challenge?domain=[&purpose=revoke]`: mint a challenge to sign
//! - `GET /health`: liveness and crypto readiness

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use handlers::AppState;
pub use server::{router, serve_listener, RpcServer};
