//! Consumed-nonce registry: at-most-once acceptance of challenge nonces.
//!
//! Per-nonce lifecycle: `Unseen → Consumed → (Expired | RolledBack)`.
//! A nonce is consumed tentatively before the expensive gates run and rolled
//! back if a later gate rejects the attempt; a successful verification keeps
//! it until it expires.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use linkgate_types::Timestamp;

/// How long a consumed nonce is remembered: 5 minutes.
pub const DEFAULT_NONCE_TTL_MS: u64 = 5 * 60 * 1000;

#[derive(Debug)]
pub struct NonceRegistry {
    ttl_ms: u64,
    consumed: Mutex<HashMap<String, Timestamp>>,
}

impl Default for NonceRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_NONCE_TTL_MS)
    }
}

impl NonceRegistry {
    pub fn new(ttl_ms: u64) -> Self {
        Self {
            ttl_ms,
            consumed: Mutex::new(HashMap::new()),
        }
    }

    // The map holds plain data, so a panic elsewhere cannot leave it half-updated.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, Timestamp>> {
        self.consumed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically mark `nonce` as consumed at `now`.
    ///
    /// Returns `false` if it is already consumed and not yet expired. Among
    /// concurrent callers with the same nonce exactly one gets `true`.
    pub fn try_consume(&self, nonce: &str, now: Timestamp) -> bool {
        let mut entries = self.entries();
        if let Some(consumed_at) = entries.get(nonce) {
            if !consumed_at.has_expired(self.ttl_ms, now) {
                return false;
            }
        }
        entries.insert(nonce.to_string(), now);
        true
    }

    /// Forget a tentatively consumed nonce. Returns whether it was present.
    pub fn rollback(&self, nonce: &str) -> bool {
        self.entries().remove(nonce).is_some()
    }

    /// Drop entries older than the TTL. Returns how many were removed.
    pub fn sweep_expired(&self, now: Timestamp) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, consumed_at| !consumed_at.has_expired(self.ttl_ms, now));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }
}

/// A tentative consumption that rolls back on drop unless committed.
pub(crate) struct NonceReservation<'a> {
    registry: &'a NonceRegistry,
    nonce: String,
    committed: bool,
}

impl<'a> NonceReservation<'a> {
    /// Consume `nonce`, or `None` if it was already consumed.
    pub(crate) fn acquire(registry: &'a NonceRegistry, nonce: &str, now: Timestamp) -> Option<Self> {
        registry.try_consume(nonce, now).then(|| Self {
            registry,
            nonce: nonce.to_string(),
            committed: false,
        })
    }

    /// Keep the nonce consumed until it expires.
    pub(crate) fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for NonceReservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.registry.rollback(&self.nonce);
        }
    }
}
