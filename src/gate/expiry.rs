//! Deferred-expiry timer for the pending-admission queue.
//!
//! A single deferred callback bounds how long a queued token may hold the
//! admitted slot. It is armed on the empty -> non-empty transition and kept
//! armed (idempotently) after every gate evaluation that sees a non-empty
//! queue. It fires once and is not re-armed for the next head; the next
//! arming happens only when the queue drains and refills. Once armed there
//! is no cancel path: the callback always fires, and an empty queue at fire
//! time makes it a no-op.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use super::ledger::SessionLedger;
use crate::store::UserStore;

/// Runtime timers misbehave far in the future; clamp the nominal session
/// lifetime to this ceiling instead of overflowing the timer.
const MAX_TIMER_DELAY: Duration = Duration::from_secs(2 * 365 * 24 * 60 * 60);

pub struct ExpiryTimer {
    ledger: Arc<SessionLedger>,
    store: Arc<dyn UserStore>,
    delay: Duration,
    armed: Arc<AtomicBool>,
}

impl ExpiryTimer {
    #[must_use]
    pub fn new(ledger: Arc<SessionLedger>, store: Arc<dyn UserStore>, ttl: Duration) -> Arc<Self> {
        Arc::new(Self {
            ledger,
            store,
            delay: ttl.min(MAX_TIMER_DELAY),
            armed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Arm the timer unless it is already pending. Idempotent, so callers can
    /// invoke it after every gate evaluation without stacking timers.
    pub fn ensure_armed(&self) {
        if self.armed.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!(delay_secs = self.delay.as_secs(), "session expiry timer armed");
        let ledger = Arc::clone(&self.ledger);
        let store = Arc::clone(&self.store);
        let armed = Arc::clone(&self.armed);
        let delay = self.delay;
        tokio::spawn(async move {
            sleep(delay).await;
            fire(&ledger, &store, &armed).await;
        });
    }

    /// Whether a callback is currently pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }
}

async fn fire(ledger: &SessionLedger, store: &Arc<dyn UserStore>, armed: &AtomicBool) {
    // Disarm before evicting so a request racing with the callback can re-arm
    // for the remaining entries.
    armed.store(false, Ordering::SeqCst);
    let Some(token) = ledger.evict_heads().await else {
        debug!("session expiry timer fired on empty queue");
        return;
    };
    warn!("session token expired; head evicted");
    // Durable-copy cleanup is best effort; the in-memory eviction stands
    // regardless.
    if let Err(err) = store.delete_session_token(&token).await {
        error!("failed to delete expired session token copy: {err}");
    }
}
