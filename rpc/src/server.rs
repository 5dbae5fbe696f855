//! Axum-based HTTP server.

use std::future::Future;
use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    delete_verify, get_challenge, get_verify, health, post_verify, verify_method_not_allowed,
    AppState,
};
use crate::RpcError;

/// Build the router with every endpoint.
pub fn router(state: AppState, cors_permissive: bool) -> Router {
    let router = Router::new()
        .route(
            "/verify",
            get(get_verify)
                .post(post_verify)
                .delete(delete_verify)
                .fallback(verify_method_not_allowed),
        )
        .route("/challenge", get(get_challenge))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    if cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

pub struct RpcServer {
    pub addr: SocketAddr,
}

impl RpcServer {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Bind the listening socket without serving yet.
    pub async fn bind(&self) -> Result<TcpListener, RpcError> {
        TcpListener::bind(self.addr)
            .await
            .map_err(|e| RpcError::Server(format!("failed to bind {}: {e}", self.addr)))
    }

    /// Bind and serve `app` until `shutdown` resolves.
    pub async fn serve(
        &self,
        app: Router,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), RpcError> {
        let listener = self.bind().await?;
        serve_listener(listener, app, shutdown).await
    }
}

/// Serve `app` on an already bound listener until `shutdown` resolves.
pub async fn serve_listener(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), RpcError> {
    let local = listener
        .local_addr()
        .map_err(|e| RpcError::Server(e.to_string()))?;
    tracing::info!(addr = %local, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| RpcError::Server(format!("server error: {e}")))?;
    tracing::info!("HTTP server stopped");
    Ok(())
}
