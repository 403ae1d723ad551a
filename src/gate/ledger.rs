//! Paired session registry and pending-admission queue.
//!
//! Both columns live behind one mutex so the pairing invariant — equal
//! length, same token at the same index — holds at every externally
//! observable point. `admit` and `evict_heads` are each atomic; the expiry
//! timer and the gate middleware take the same lock before mutating.

use std::collections::VecDeque;
use tokio::sync::Mutex;

/// One admitted (or queued) session slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token: String,
}

/// Result of enqueueing a freshly minted token.
#[derive(Debug, Clone, Copy)]
pub struct AdmitOutcome {
    /// Whether the queue transitioned empty -> non-empty; the caller arms the
    /// expiry timer exactly on this transition.
    pub was_empty: bool,
}

/// Derived admission state of the queue head, computed under the lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Queue is empty; nobody is admitted.
    NoSession,
    /// Queue head matches a live registry entry.
    Admitted,
    /// Queue head had no registry match; both heads were evicted as a side
    /// effect and the evicted token is returned for durable-copy cleanup.
    Stale { evicted: String },
}

#[derive(Debug, Default)]
struct Columns {
    registry: VecDeque<SessionRecord>,
    queue: VecDeque<String>,
}

#[derive(Debug, Default)]
pub struct SessionLedger {
    columns: Mutex<Columns>,
}

impl SessionLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token to both columns atomically.
    pub async fn admit(&self, token: &str) -> AdmitOutcome {
        let mut columns = self.columns.lock().await;
        let was_empty = columns.queue.is_empty();
        columns.registry.push_back(SessionRecord {
            token: token.to_string(),
        });
        columns.queue.push_back(token.to_string());
        AdmitOutcome { was_empty }
    }

    /// Peek at the queue head.
    pub async fn head(&self) -> Option<String> {
        self.columns.lock().await.queue.front().cloned()
    }

    /// Registry membership at any position.
    pub async fn contains(&self, token: &str) -> bool {
        self.columns
            .lock()
            .await
            .registry
            .iter()
            .any(|record| record.token == token)
    }

    /// Pop both heads atomically, returning the evicted queue token so the
    /// caller can delete its durable copy. No-op on empty collections.
    pub async fn evict_heads(&self) -> Option<String> {
        let mut columns = self.columns.lock().await;
        columns.registry.pop_front();
        columns.queue.pop_front()
    }

    /// Classify the queue head for the gate, evicting a stale head (one with
    /// no registry match) in the same critical section so the check and the
    /// eviction are atomic.
    pub async fn check_head(&self) -> GateState {
        let mut columns = self.columns.lock().await;
        let Some(head) = columns.queue.front().cloned() else {
            return GateState::NoSession;
        };
        let live = columns.registry.iter().any(|record| record.token == head);
        if live {
            GateState::Admitted
        } else {
            columns.registry.pop_front();
            let evicted = columns.queue.pop_front().unwrap_or(head);
            GateState::Stale { evicted }
        }
    }

    pub async fn len(&self) -> usize {
        self.columns.lock().await.queue.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.columns.lock().await.queue.is_empty()
    }

    /// Both columns as parallel vectors, for invariant assertions in tests.
    pub async fn snapshot(&self) -> (Vec<String>, Vec<String>) {
        let columns = self.columns.lock().await;
        (
            columns
                .registry
                .iter()
                .map(|record| record.token.clone())
                .collect(),
            columns.queue.iter().cloned().collect(),
        )
    }
}

#[cfg(test)]
impl SessionLedger {
    /// Drop the registry head while leaving the queue untouched, leaving a
    /// stale queue head behind.
    pub(crate) async fn drop_registry_head(&self) {
        self.columns.lock().await.registry.pop_front();
    }
}
