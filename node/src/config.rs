//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use linkgate_crypto::MessageEncoding;
use linkgate_types::NetworkId;
use linkgate_verification::challenge::{DEFAULT_MAX_AGE_MS, DEFAULT_MAX_FUTURE_SKEW_MS};
use linkgate_verification::{EngineConfig, FreshnessWindow, DEFAULT_NONCE_TTL_MS};

use crate::NodeError;

/// Which [`linkgate_store::VerificationStore`] backend to open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// LMDB environment under `<data_dir>/lmdb`.
    #[default]
    Lmdb,
    /// A single `<data_dir>/verifications.json` file.
    Json,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lmdb" => Ok(Self::Lmdb),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown storage backend {other:?}, expected lmdb or json")),
        }
    }
}

/// Configuration for a linkgate node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Which network's address prefix claims must carry.
    #[serde(default = "default_network")]
    pub network: NetworkId,

    /// Data directory for verification storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Storage backend: "lmdb" or "json".
    #[serde(default)]
    pub storage: StorageBackend,

    /// Interface the HTTP server binds to.
    #[serde(default = "default_rpc_bind")]
    pub rpc_bind: String,

    /// HTTP port.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Allow any origin via CORS.
    #[serde(default)]
    pub cors_permissive: bool,

    #[serde(default)]
    pub verification: VerificationConfig,

    #[serde(default)]
    pub revocation: RevocationConfig,
}

/// `[verification]` section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Oldest accepted challenge timestamp, relative to now.
    #[serde(default = "default_max_age_ms")]
    pub max_age_ms: u64,

    /// How far in the future a challenge timestamp may be.
    #[serde(default = "default_max_future_skew_ms")]
    pub max_future_skew_ms: u64,

    /// How long a consumed nonce is remembered.
    #[serde(default = "default_nonce_ttl_ms")]
    pub nonce_ttl_ms: u64,

    /// Period of the expired-nonce sweep.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// How wallets encode the challenge before signing.
    #[serde(default)]
    pub message_encoding: MessageEncoding,
}

/// `[revocation]` section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationConfig {
    /// Demand a signature from the verified key on `DELETE /verify`.
    #[serde(default = "default_true")]
    pub require_signature: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_network() -> NetworkId {
    NetworkId::Mainnet
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./linkgate_data")
}

fn default_rpc_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_rpc_port() -> u16 {
    8787
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_age_ms() -> u64 {
    DEFAULT_MAX_AGE_MS
}

fn default_max_future_skew_ms() -> u64 {
    DEFAULT_MAX_FUTURE_SKEW_MS
}

fn default_nonce_ttl_ms() -> u64 {
    DEFAULT_NONCE_TTL_MS
}

fn default_sweep_interval_secs() -> u64 {
    60
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(format!("{path}: {e}")))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Reject values the node cannot run with.
    pub fn validate(&self) -> Result<(), NodeError> {
        if self.verification.nonce_ttl_ms < self.verification.max_age_ms {
            return Err(NodeError::Config(format!(
                "verification.nonce_ttl_ms ({}) must be at least verification.max_age_ms ({})",
                self.verification.nonce_ttl_ms, self.verification.max_age_ms
            )));
        }
        if self.verification.sweep_interval_secs == 0 {
            return Err(NodeError::Config(
                "verification.sweep_interval_secs must be positive".to_string(),
            ));
        }
        self.rpc_addr().map(|_| ())
    }

    /// Socket address the HTTP server binds to.
    pub fn rpc_addr(&self) -> Result<SocketAddr, NodeError> {
        let ip: IpAddr = self
            .rpc_bind
            .parse()
            .map_err(|e| NodeError::Config(format!("invalid rpc_bind {:?}: {e}", self.rpc_bind)))?;
        Ok(SocketAddr::new(ip, self.rpc_port))
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            freshness: FreshnessWindow {
                max_age_ms: self.verification.max_age_ms,
                max_future_skew_ms: self.verification.max_future_skew_ms,
            },
            message_encoding: self.verification.message_encoding,
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            data_dir: default_data_dir(),
            storage: StorageBackend::default(),
            rpc_bind: default_rpc_bind(),
            rpc_port: default_rpc_port(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            cors_permissive: false,
            verification: VerificationConfig::default(),
            revocation: RevocationConfig::default(),
        }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            max_age_ms: default_max_age_ms(),
            max_future_skew_ms: default_max_future_skew_ms(),
            nonce_ttl_ms: default_nonce_ttl_ms(),
            sweep_interval_secs: default_sweep_interval_secs(),
            message_encoding: MessageEncoding::default(),
        }
    }
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            require_signature: default_true(),
        }
    }
}
