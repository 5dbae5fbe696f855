//! linkgate daemon: entry point for running a verification node, plus a few
//! offline helpers for wallets and operators.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use linkgate_crypto::{
    derive_address, wallet_public_key, MessageEncoding, PublicKey, SecretKey, WALLET_OBSERVER_PATH,
};
use linkgate_node::{init_logging, open_store, LinkgateNode, LogFormat, NodeConfig, StorageBackend};
use linkgate_types::{NetworkId, Timestamp};
use linkgate_verification::ChallengeBuilder;

#[derive(Parser)]
#[command(name = "linkgate", about = "Domain ownership verification over Chia-style BLS signatures")]
struct Cli {
    /// Network whose addresses are accepted: "mainnet" or "testnet".
    /// When a config file is provided, defaults to the file's network value.
    #[arg(long, env = "LINKGATE_NETWORK")]
    network: Option<NetworkId>,

    /// Data directory for verification storage.
    #[arg(long, env = "LINKGATE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Storage backend: "lmdb" or "json".
    #[arg(long, env = "LINKGATE_STORAGE")]
    storage: Option<StorageBackend>,

    /// Interface the HTTP server binds to.
    #[arg(long, env = "LINKGATE_RPC_BIND")]
    rpc_bind: Option<String>,

    /// HTTP server port.
    #[arg(long, env = "LINKGATE_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Allow any CORS origin.
    #[arg(long, env = "LINKGATE_CORS_PERMISSIVE")]
    cors_permissive: bool,

    /// Accept unsigned `DELETE /verify` requests.
    #[arg(long, env = "LINKGATE_UNSIGNED_REVOCATION")]
    unsigned_revocation: bool,

    /// Log format: "human" or "json".
    #[arg(long, env = "LINKGATE_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "LINKGATE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "LINKGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Serve the HTTP API until SIGINT/SIGTERM.
    Run,

    /// Print a fresh ownership challenge for a domain.
    Challenge {
        #[arg(long)]
        domain: String,

        /// Mint a revocation challenge instead.
        #[arg(long)]
        revoke: bool,
    },

    /// Print the address a BLS public key controls.
    DeriveAddress {
        /// 48-byte G1 public key, hex.
        #[arg(long)]
        public_key: String,

        /// Treat the key as a master key and derive wallet key `index` first.
        #[arg(long)]
        index: Option<u32>,
    },

    /// Sign a message with a key derived from a seed (development helper).
    Sign {
        /// Seed bytes, hex (at least 32 bytes).
        #[arg(long)]
        seed: String,

        #[arg(long)]
        message: String,

        /// Sign with wallet key `index` under the seed's master key.
        #[arg(long)]
        index: Option<u32>,

        /// "raw" or "chip0002".
        #[arg(long, default_value = "raw")]
        encoding: String,
    },

    /// Dump every stored record as one JSON object keyed by domain.
    List,
}

impl Cli {
    /// File config (if any) overridden by flags and env vars.
    fn node_config(&self) -> anyhow::Result<NodeConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let path = path.to_string_lossy();
                NodeConfig::from_toml_file(&path)
                    .with_context(|| format!("loading config file {path}"))?
            }
            None => NodeConfig::default(),
        };

        if let Some(network) = self.network {
            config.network = network;
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(storage) = self.storage {
            config.storage = storage;
        }
        if let Some(bind) = &self.rpc_bind {
            config.rpc_bind = bind.clone();
        }
        if let Some(port) = self.rpc_port {
            config.rpc_port = port;
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        config.cors_permissive |= self.cors_permissive;
        if self.unsigned_revocation {
            config.revocation.require_signature = false;
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_encoding(s: &str) -> anyhow::Result<MessageEncoding> {
    match s.to_ascii_lowercase().as_str() {
        "raw" => Ok(MessageEncoding::Raw),
        "chip0002" => Ok(MessageEncoding::Chip0002),
        other => anyhow::bail!("unknown encoding {other:?}, expected raw or chip0002"),
    }
}

/// Secret side of [`wallet_public_key`].
fn wallet_secret_key(master: &SecretKey, index: u32) -> anyhow::Result<SecretKey> {
    let mut sk = master.derive_child_unhardened(WALLET_OBSERVER_PATH[0])?;
    for i in WALLET_OBSERVER_PATH[1..].iter().copied().chain([index]) {
        sk = sk.derive_child_unhardened(i)?;
    }
    Ok(sk)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.node_config()?;

    match cli.command {
        Command::Run => {
            let format: LogFormat = config.log_format.parse()?;
            init_logging(format, &config.log_level)?;
            tracing::info!(
                "Starting linkgate on {} (HTTP {}:{}, storage {:?})",
                config.network,
                config.rpc_bind,
                config.rpc_port,
                config.storage,
            );
            LinkgateNode::new(config)?.run().await?;
        }
        Command::Challenge { domain, revoke } => {
            let now = Timestamp::now();
            let challenge = if revoke {
                ChallengeBuilder::issue_revocation(&domain, now)?
            } else {
                ChallengeBuilder::issue(&domain, now)?
            };
            print_json(&challenge)?;
        }
        Command::DeriveAddress { public_key, index } => {
            let master = PublicKey::from_hex(&public_key).context("parsing public key")?;
            let key = match index {
                Some(i) => wallet_public_key(&master, i)?,
                None => master,
            };
            let address = derive_address(&key, config.network)?;
            print_json(&serde_json::json!({
                "publicKey": key.to_hex(),
                "address": address.as_str(),
            }))?;
        }
        Command::Sign {
            seed,
            message,
            index,
            encoding,
        } => {
            let seed = hex::decode(seed.trim_start_matches("0x")).context("seed is not hex")?;
            let master = SecretKey::from_seed(&seed)?;
            let sk = match index {
                Some(i) => wallet_secret_key(&master, i)?,
                None => master,
            };
            let payload = parse_encoding(&encoding)?.signing_payload(&message);
            let pk = sk.public_key();
            let address = derive_address(&pk, config.network)?;
            print_json(&serde_json::json!({
                "message": message,
                "signature": sk.sign(&payload).to_hex(),
                "publicKey": pk.to_hex(),
                "address": address.as_str(),
            }))?;
        }
        Command::List => {
            let store = open_store(&config)?;
            let records: BTreeMap<String, _> = store
                .list()?
                .into_iter()
                .map(|r| (r.domain.as_str().to_string(), r))
                .collect();
            print_json(&records)?;
        }
    }

    Ok(())
}
