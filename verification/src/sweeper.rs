//! Background eviction of expired nonces.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use linkgate_types::Clock;

use crate::NonceRegistry;

/// Periodically run [`NonceRegistry::sweep_expired`] until `shutdown` fires.
///
/// The registry lock is held for a single map pass, so sweeping never stalls
/// verification for longer than that.
pub fn spawn_nonce_sweeper(
    registry: Arc<NonceRegistry>,
    clock: Arc<dyn Clock>,
    every: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = registry.sweep_expired(clock.now());
                    tracing::debug!(removed, remaining = registry.len(), "swept expired nonces");
                }
                _ = shutdown.recv() => {
                    tracing::debug!("nonce sweeper stopping");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkgate_nullables::NullClock;
    use linkgate_types::Timestamp;

    #[tokio::test(start_paused = true)]
    async fn sweeps_on_interval_and_stops_on_shutdown() {
        let registry = Arc::new(NonceRegistry::new(1_000));
        let clock = Arc::new(NullClock::new(0));
        registry.try_consume("old", Timestamp::from_millis(0));

        let (tx, rx) = broadcast::channel(1);
        let handle = spawn_nonce_sweeper(registry.clone(), clock.clone(), Duration::from_secs(60), rx);

        clock.set(5_000);
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(registry.is_empty());

        tx.send(()).unwrap();
        handle.await.unwrap();
    }
}
