//! One-time crypto readiness gate.

use std::sync::Arc;

use tokio::sync::OnceCell;

use linkgate_crypto::{CryptoError, CryptoProvider};

use crate::VerificationError;

/// Runs the provider's self-test once and remembers the outcome.
///
/// Concurrent first callers of [`CryptoGate::ready`] await the same
/// initialization. A failed self-test is sticky.
pub struct CryptoGate {
    provider: Arc<dyn CryptoProvider>,
    state: OnceCell<Result<(), CryptoError>>,
}

impl CryptoGate {
    pub fn new(provider: Arc<dyn CryptoProvider>) -> Self {
        Self {
            provider,
            state: OnceCell::new(),
        }
    }

    /// The provider, once its self-test has passed.
    pub async fn ready(&self) -> Result<&Arc<dyn CryptoProvider>, VerificationError> {
        let outcome = self
            .state
            .get_or_init(|| async {
                let provider = Arc::clone(&self.provider);
                let outcome = tokio::task::spawn_blocking(move || provider.self_test())
                    .await
                    .unwrap_or_else(|e| Err(CryptoError::SelfTest(e.to_string())));
                match &outcome {
                    Ok(()) => tracing::info!("crypto self-test passed"),
                    Err(e) => tracing::error!(error = %e, "crypto self-test failed"),
                }
                outcome
            })
            .await;
        match outcome {
            Ok(()) => Ok(&self.provider),
            Err(e) => Err(VerificationError::CryptoUnavailable(e.to_string())),
        }
    }

    /// Whether the self-test has already passed. Never triggers it.
    pub fn is_ready(&self) -> bool {
        matches!(self.state.get(), Some(Ok(())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkgate_nullables::NullCryptoProvider;
    use linkgate_types::NetworkId;

    #[tokio::test]
    async fn ready_runs_self_test_once() {
        let gate = CryptoGate::new(Arc::new(NullCryptoProvider::new(NetworkId::Mainnet)));
        assert!(!gate.is_ready());
        assert!(gate.ready().await.is_ok());
        assert!(gate.is_ready());
        assert!(gate.ready().await.is_ok());
    }

    #[tokio::test]
    async fn failure_is_sticky() {
        let gate = CryptoGate::new(Arc::new(NullCryptoProvider::unavailable(NetworkId::Mainnet)));
        for _ in 0..2 {
            assert!(matches!(
                gate.ready().await,
                Err(VerificationError::CryptoUnavailable(_))
            ));
        }
        assert!(!gate.is_ready());
    }

    #[tokio::test]
    async fn concurrent_callers_share_initialization() {
        let gate = Arc::new(CryptoGate::new(Arc::new(NullCryptoProvider::new(
            NetworkId::Testnet,
        ))));
        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let gate = Arc::clone(&gate);
                tokio::spawn(async move { gate.ready().await.is_ok() })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap());
        }
    }
}
