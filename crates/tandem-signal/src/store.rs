//! Signal store: the time-bounded envelope buffer behind the router.
//!
//! Holds every envelope submitted in the last retention window, in id order.
//! All operations take the same lock, so an `append` never interleaves with a
//! half-finished eviction and no id is ever handed out twice.

use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tandem_common::models::{Envelope, EnvelopeId, OutboundSignal};
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default retention window for envelopes.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(30);

/// Default cap on buffered envelopes.
pub const DEFAULT_CAPACITY: usize = 1000;

#[derive(Clone)]
pub struct SignalStore {
    inner: Arc<Mutex<StoreInner>>,
    retention: Duration,
    capacity: usize,
}

struct StoreInner {
    /// Next id to hand out. Ids start at 1 so a cursor of 0 means "nothing seen".
    next_id: EnvelopeId,
    /// Ascending by id, and therefore by `stored_at`.
    entries: VecDeque<StoredEnvelope>,
}

struct StoredEnvelope {
    envelope: Envelope,
    stored_at: Instant,
}

impl SignalStore {
    pub fn new(retention: Duration, capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                next_id: 1,
                entries: VecDeque::new(),
            })),
            retention,
            capacity: capacity.max(1),
        }
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Number the signal, stamp it, and store it. Returns the assigned id.
    pub async fn append(&self, signal: OutboundSignal) -> EnvelopeId {
        let now = Instant::now();
        let mut inner = self.inner.lock().await;
        inner.evict_expired(now, self.retention);
        inner.push(signal, now, self.capacity)
    }

    /// Drop every envelope from the signal's sender, then append the signal,
    /// under one lock. Returns the assigned id and how many envelopes were dropped.
    pub async fn replace_sender_trail(&self, signal: OutboundSignal) -> (EnvelopeId, usize) {
        let now = Instant::now();
        let mut inner = self.inner.lock().await;
        inner.evict_expired(now, self.retention);

        let before = inner.entries.len();
        inner.entries.retain(|e| e.envelope.from != signal.from);
        let cleared = before - inner.entries.len();

        (inner.push(signal, now, self.capacity), cleared)
    }

    /// Live envelopes not sent by `exclude_from` and newer than `after_id`, ascending by id.
    pub async fn query(&self, exclude_from: &str, after_id: Option<EnvelopeId>) -> Vec<Envelope> {
        let mut inner = self.inner.lock().await;
        inner.evict_expired(Instant::now(), self.retention);

        let floor = after_id.unwrap_or(0);
        inner
            .entries
            .iter()
            .map(|e| &e.envelope)
            .filter(|e| e.id > floor && e.from != exclude_from)
            .cloned()
            .collect()
    }

    /// Drop every envelope matching `predicate`. Returns how many were removed.
    pub async fn remove_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Envelope) -> bool,
    {
        let mut inner = self.inner.lock().await;
        inner.evict_expired(Instant::now(), self.retention);

        let before = inner.entries.len();
        inner.entries.retain(|e| !predicate(&e.envelope));
        before - inner.entries.len()
    }

    /// Count of live envelopes.
    pub async fn len(&self) -> usize {
        let mut inner = self.inner.lock().await;
        inner.evict_expired(Instant::now(), self.retention);
        inner.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for SignalStore {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION, DEFAULT_CAPACITY)
    }
}

impl StoreInner {
    fn push(&mut self, signal: OutboundSignal, now: Instant, capacity: usize) -> EnvelopeId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push_back(StoredEnvelope {
            envelope: Envelope {
                id,
                from: signal.from,
                to: signal.to,
                payload: signal.payload,
                created_at: Utc::now(),
            },
            stored_at: now,
        });

        let overflow = self.entries.len().saturating_sub(capacity);
        if overflow > 0 {
            self.entries.drain(..overflow);
            tracing::warn!(
                dropped = overflow,
                capacity,
                "Signal store over capacity, dropped oldest envelopes"
            );
        }

        id
    }

    fn evict_expired(&mut self, now: Instant, retention: Duration) {
        let mut evicted = 0usize;
        while let Some(front) = self.entries.front() {
            if now.saturating_duration_since(front.stored_at) < retention {
                break;
            }
            self.entries.pop_front();
            evicted += 1;
        }
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted expired signals");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_common::models::SignalPayload;

    fn signal(from: &str, payload: SignalPayload) -> OutboundSignal {
        OutboundSignal {
            from: from.into(),
            to: None,
            payload,
        }
    }

    fn candidate(n: u32) -> SignalPayload {
        SignalPayload::Candidate {
            ice_candidate: serde_json::json!({ "candidate": format!("candidate:{n}") }),
        }
    }

    #[tokio::test]
    async fn ids_are_strictly_increasing() {
        let store = SignalStore::default();
        let a = store.append(signal("alice", candidate(1))).await;
        let b = store.append(signal("bob", candidate(2))).await;
        let c = store.append(signal("alice", candidate(3))).await;
        assert_eq!((a, b, c), (1, 2, 3));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_removal() {
        let store = SignalStore::default();
        store.append(signal("alice", candidate(1))).await;
        store.append(signal("alice", candidate(2))).await;
        assert_eq!(store.remove_where(|_| true).await, 2);
        assert_eq!(store.append(signal("alice", candidate(3))).await, 3);
    }

    #[tokio::test]
    async fn query_filters_sender_and_cursor() {
        let store = SignalStore::default();
        store.append(signal("alice", candidate(1))).await;
        store.append(signal("bob", candidate(2))).await;
        store.append(signal("bob", candidate(3))).await;
        store.append(signal("alice", candidate(4))).await;

        let for_alice: Vec<_> = store.query("alice", None).await.iter().map(|e| e.id).collect();
        assert_eq!(for_alice, vec![2, 3]);

        let for_alice: Vec<_> = store.query("alice", Some(2)).await.iter().map(|e| e.id).collect();
        assert_eq!(for_alice, vec![3]);

        let for_bob: Vec<_> = store.query("bob", Some(0)).await.iter().map(|e| e.id).collect();
        assert_eq!(for_bob, vec![1, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_envelopes_vanish_without_new_appends() {
        let store = SignalStore::new(Duration::from_secs(30), DEFAULT_CAPACITY);
        store.append(signal("alice", candidate(1))).await;

        tokio::time::advance(Duration::from_secs(29)).await;
        assert_eq!(store.query("bob", None).await.len(), 1);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(store.query("bob", None).await.is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn eviction_keeps_younger_envelopes() {
        let store = SignalStore::new(Duration::from_secs(30), DEFAULT_CAPACITY);
        store.append(signal("alice", candidate(1))).await;
        tokio::time::advance(Duration::from_secs(20)).await;
        store.append(signal("alice", candidate(2))).await;
        tokio::time::advance(Duration::from_secs(15)).await;

        let ids: Vec<_> = store.query("bob", None).await.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn capacity_drops_oldest_first() {
        let store = SignalStore::new(DEFAULT_RETENTION, 3);
        for n in 0..5 {
            store.append(signal("alice", candidate(n))).await;
        }
        let ids: Vec<_> = store.query("bob", None).await.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
    }

    #[tokio::test]
    async fn replace_sender_trail_keeps_other_senders() {
        let store = SignalStore::default();
        store.append(signal("alice", candidate(1))).await;
        store.append(signal("bob", candidate(2))).await;
        store.append(signal("alice", candidate(3))).await;

        let (id, cleared) = store.replace_sender_trail(signal("alice", SignalPayload::End)).await;
        assert_eq!((id, cleared), (4, 2));

        let remaining: Vec<_> = store.query("nobody", None).await.iter().map(|e| e.id).collect();
        assert_eq!(remaining, vec![2, 4]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn end_is_atomic_against_concurrent_submits() {
        for _ in 0..20 {
            let store = SignalStore::default();
            let mut handles = Vec::new();
            for n in 0..40 {
                let store = store.clone();
                handles.push(tokio::spawn(async move {
                    store.append(signal("alice", candidate(n))).await;
                }));
            }
            let (end_id, _) = store.replace_sender_trail(signal("alice", SignalPayload::End)).await;
            for handle in handles {
                handle.await.unwrap();
            }

            // Anything of alice's older than her End must have been cleared with it.
            let stale = store
                .query("nobody", None)
                .await
                .into_iter()
                .filter(|e| e.from == "alice" && e.id < end_id)
                .count();
            assert_eq!(stale, 0);
        }
    }

    #[tokio::test]
    async fn concurrent_appends_never_share_an_id() {
        let store = SignalStore::default();
        let mut handles = Vec::new();
        for n in 0..50 {
            let store = store.clone();
            let from = if n % 2 == 0 { "alice" } else { "bob" };
            handles.push(tokio::spawn(async move {
                store.append(signal(from, candidate(n))).await
            }));
        }
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 50);
        assert_eq!(ids.first(), Some(&1));
        assert_eq!(ids.last(), Some(&50));
    }
}
