//! The linkgate node: wires storage, the verification engine, the nonce
//! sweeper and the HTTP server together.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use linkgate_crypto::{BlsCryptoProvider, CryptoProvider};
use linkgate_rpc::{router, serve_listener, AppState, RpcServer};
use linkgate_store::VerificationStore;
use linkgate_store_json::JsonFileStore;
use linkgate_store_lmdb::environment::DEFAULT_MAP_SIZE;
use linkgate_store_lmdb::LmdbEnvironment;
use linkgate_types::{Clock, SystemClock};
use linkgate_verification::{spawn_nonce_sweeper, NonceRegistry, VerificationEngine};

use crate::config::{NodeConfig, StorageBackend};
use crate::shutdown::ShutdownController;
use crate::NodeError;

/// File name of the JSON backend inside `data_dir`.
pub const JSON_STORE_FILE: &str = "verifications.json";
/// Directory of the LMDB environment inside `data_dir`.
pub const LMDB_DIR: &str = "lmdb";

/// Open the storage backend selected by `config`.
pub fn open_store(config: &NodeConfig) -> Result<Arc<dyn VerificationStore>, NodeError> {
    match config.storage {
        StorageBackend::Lmdb => {
            let path = config.data_dir.join(LMDB_DIR);
            let env = LmdbEnvironment::open(&path, DEFAULT_MAP_SIZE)?;
            tracing::info!(path = %path.display(), "opened LMDB verification store");
            Ok(Arc::new(env.verification_store()))
        }
        StorageBackend::Json => {
            let path = config.data_dir.join(JSON_STORE_FILE);
            let store = JsonFileStore::open(path.clone())?;
            tracing::info!(path = %path.display(), "opened JSON verification store");
            Ok(Arc::new(store))
        }
    }
}

/// A running linkgate node.
pub struct LinkgateNode {
    pub config: NodeConfig,
    pub engine: Arc<VerificationEngine>,
    pub store: Arc<dyn VerificationStore>,
    pub shutdown: Arc<ShutdownController>,
    clock: Arc<dyn Clock>,
    /// Address the HTTP server actually bound, once started.
    local_addr: Option<SocketAddr>,
    /// Handles for spawned background tasks (joined during shutdown).
    task_handles: Vec<JoinHandle<()>>,
}

impl LinkgateNode {
    /// Open the configured store and build the engine with the real BLS
    /// provider and the system clock.
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        config.validate()?;
        let store = open_store(&config)?;
        let crypto = Arc::new(BlsCryptoProvider::new(config.network));
        Ok(Self::with_components(config, store, crypto, Arc::new(SystemClock)))
    }

    /// Build a node around caller-supplied components.
    pub fn with_components(
        config: NodeConfig,
        store: Arc<dyn VerificationStore>,
        crypto: Arc<dyn CryptoProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let nonces = Arc::new(NonceRegistry::new(config.verification.nonce_ttl_ms));
        let engine = VerificationEngine::new(
            store.clone(),
            nonces,
            crypto,
            clock.clone(),
            config.engine_config(),
        );
        Self {
            config,
            engine: Arc::new(engine),
            store,
            shutdown: Arc::new(ShutdownController::new()),
            clock,
            local_addr: None,
            task_handles: Vec::new(),
        }
    }

    /// Address the HTTP server is listening on, after [`LinkgateNode::start`].
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Warm up crypto, start the nonce sweeper and begin serving HTTP.
    ///
    /// A failed crypto self-test does not abort startup: reads keep working
    /// and every write answers `CryptoUnavailable`.
    pub async fn start(&mut self) -> Result<(), NodeError> {
        tracing::info!(
            network = %self.config.network,
            storage = ?self.config.storage,
            data_dir = %self.config.data_dir.display(),
            "linkgate node starting"
        );

        let listener = RpcServer::new(self.config.rpc_addr()?).bind().await?;
        self.local_addr = Some(listener.local_addr()?);

        if let Err(e) = self.engine.warm_up().await {
            tracing::error!(error = %e, "crypto unavailable, verification writes will be refused");
        }

        let sweeper = spawn_nonce_sweeper(
            self.engine.nonces().clone(),
            self.clock.clone(),
            Duration::from_secs(self.config.verification.sweep_interval_secs),
            self.shutdown.subscribe(),
        );
        self.task_handles.push(sweeper);

        let state = AppState {
            engine: self.engine.clone(),
            require_signed_revocation: self.config.revocation.require_signature,
        };
        let app = router(state, self.config.cors_permissive);

        let shutdown = self.shutdown.signalled();
        let server = tokio::spawn(async move {
            if let Err(e) = serve_listener(listener, app, shutdown).await {
                tracing::error!(error = %e, "HTTP server exited with error");
            }
        });
        self.task_handles.push(server);
        Ok(())
    }

    /// Signal every task and wait for them to finish.
    pub async fn stop(&mut self) -> Result<(), NodeError> {
        tracing::info!("linkgate node stopping");
        self.shutdown.shutdown();
        for handle in self.task_handles.drain(..) {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "background task ended abnormally");
            }
        }
        tracing::info!("linkgate node stopped");
        Ok(())
    }

    /// Start, serve until SIGINT/SIGTERM, then stop.
    pub async fn run(mut self) -> Result<(), NodeError> {
        self.start().await?;
        self.shutdown.wait_for_signal().await;
        self.stop().await
    }
}
