//! Signal router: the submit/poll surface over the [`SignalStore`].
//!
//! Peers never talk to each other directly. Each one submits envelopes and
//! polls for the other side's envelopes, passing back the highest id it has
//! seen. Delivery is at-most-once per id as long as the cursor advances; a
//! retry with an unchanged cursor returns the same set again.

use crate::store::SignalStore;
use std::time::Duration;
use tandem_common::error::TandemResult;
use tandem_common::models::{Envelope, EnvelopeId, OutboundSignal, SubmitSignalRequest};
use tandem_common::validation::{require_name, validate_submission};

#[derive(Clone, Default)]
pub struct SignalRouter {
    store: SignalStore,
}

impl SignalRouter {
    pub fn new(store: SignalStore) -> Self {
        Self { store }
    }

    pub fn with_limits(retention: Duration, capacity: usize) -> Self {
        Self::new(SignalStore::new(retention, capacity))
    }

    pub fn store(&self) -> &SignalStore {
        &self.store
    }

    /// Validate a raw submission and route it.
    pub async fn submit(&self, req: SubmitSignalRequest) -> TandemResult<EnvelopeId> {
        let signal = validate_submission(req)?;
        Ok(self.route(signal).await)
    }

    /// Store an already-validated signal.
    ///
    /// An `End` clears every envelope the sender still has buffered and goes
    /// in like any other envelope, in one step, so the other peer sees it on its
    /// next poll. Envelopes from the other peer are left alone.
    pub async fn route(&self, signal: OutboundSignal) -> EnvelopeId {
        let kind = signal.payload.kind();
        let from = signal.from.clone();

        let id = if signal.payload.is_end() {
            let (id, cleared) = self.store.replace_sender_trail(signal).await;
            tracing::debug!(from = %from, cleared, "Cleared sender trail on end");
            id
        } else {
            self.store.append(signal).await
        };

        tracing::debug!(id, from = %from, kind, "Signal stored");
        id
    }

    /// Everything addressed past `last_id` that `user` did not send.
    pub async fn poll(&self, user: Option<&str>, last_id: Option<EnvelopeId>) -> TandemResult<Vec<Envelope>> {
        let user = require_name(user, "user required")?;
        Ok(self.store.query(user, last_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_common::models::{MediaKind, SignalPayload};

    fn submit(from: &str, payload: SignalPayload) -> SubmitSignalRequest {
        SubmitSignalRequest {
            from: Some(from.into()),
            to: None,
            signal: Some(payload),
        }
    }

    fn candidate(n: u32) -> SignalPayload {
        SignalPayload::Candidate {
            ice_candidate: serde_json::json!({ "candidate": format!("candidate:{n}") }),
        }
    }

    fn ids(envelopes: &[Envelope]) -> Vec<EnvelopeId> {
        envelopes.iter().map(|e| e.id).collect()
    }

    #[tokio::test]
    async fn offer_answer_exchange() {
        let router = SignalRouter::default();

        let offer = SignalPayload::Offer {
            sdp: "s1".into(),
            media_kind: MediaKind::Video,
        };
        assert_eq!(router.submit(submit("A", offer.clone())).await.unwrap(), 1);

        let for_b = router.poll(Some("B"), None).await.unwrap();
        assert_eq!(ids(&for_b), vec![1]);
        assert_eq!(for_b[0].payload, offer);

        let answer = SignalPayload::Answer { sdp: "s2".into() };
        assert_eq!(router.submit(submit("B", answer.clone())).await.unwrap(), 2);

        let for_a = router.poll(Some("A"), Some(0)).await.unwrap();
        assert_eq!(ids(&for_a), vec![2]);
        assert_eq!(for_a[0].payload, answer);

        assert!(router.poll(Some("A"), Some(2)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn end_clears_only_the_senders_trail() {
        let router = SignalRouter::default();
        router.submit(submit("A", candidate(1))).await.unwrap();
        router.submit(submit("B", candidate(2))).await.unwrap();
        router.submit(submit("A", candidate(3))).await.unwrap();

        let end_id = router.submit(submit("A", SignalPayload::End)).await.unwrap();
        assert_eq!(end_id, 4);

        // B sees only the End; A's candidates are gone.
        let for_b = router.poll(Some("B"), None).await.unwrap();
        assert_eq!(ids(&for_b), vec![4]);
        assert!(for_b[0].payload.is_end());

        // B's own candidate survives for A.
        let for_a = router.poll(Some("A"), None).await.unwrap();
        assert_eq!(ids(&for_a), vec![2]);
    }

    #[tokio::test]
    async fn end_reaches_peer_with_stale_cursor() {
        let router = SignalRouter::default();
        router
            .submit(submit(
                "A",
                SignalPayload::Offer {
                    sdp: "s1".into(),
                    media_kind: MediaKind::Audio,
                },
            ))
            .await
            .unwrap();
        router
            .submit(submit("B", SignalPayload::Answer { sdp: "s2".into() }))
            .await
            .unwrap();
        let end_id = router.submit(submit("A", SignalPayload::End)).await.unwrap();
        assert_eq!(end_id, 3);

        for cursor in [None, Some(0), Some(1), Some(2)] {
            let for_b = router.poll(Some("B"), cursor).await.unwrap();
            assert!(for_b.iter().any(|e| e.id == 3 && e.payload.is_end()));
        }
    }

    #[tokio::test]
    async fn repoll_with_same_cursor_is_idempotent() {
        let router = SignalRouter::default();
        for n in 0..4 {
            router.submit(submit("A", candidate(n))).await.unwrap();
        }
        let first = router.poll(Some("B"), Some(1)).await.unwrap();
        let second = router.poll(Some("B"), Some(1)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(ids(&first), vec![2, 3, 4]);
    }

    #[tokio::test]
    async fn burst_of_candidates_is_delivered_in_order() {
        let router = SignalRouter::default();
        for n in 0..10 {
            router.submit(submit("A", candidate(n))).await.unwrap();
        }
        let for_b = router.poll(Some("B"), None).await.unwrap();
        assert_eq!(ids(&for_b), (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn poll_never_returns_own_or_acknowledged_envelopes() {
        let router = SignalRouter::default();
        let senders = ["A", "B", "A", "A", "B", "C", "B"];
        for (n, from) in senders.iter().enumerate() {
            router.submit(submit(from, candidate(n as u32))).await.unwrap();
        }
        for user in ["A", "B", "C"] {
            for cursor in 0..=senders.len() as u64 {
                let got = router.poll(Some(user), Some(cursor)).await.unwrap();
                assert!(got.iter().all(|e| e.id > cursor && e.from != user));
                assert!(got.windows(2).all(|w| w[0].id < w[1].id));
            }
        }
    }

    #[tokio::test]
    async fn recipient_is_not_used_for_filtering() {
        let router = SignalRouter::default();
        let mut req = submit("A", candidate(1));
        req.to = Some("B".into());
        router.submit(req).await.unwrap();

        assert_eq!(router.poll(Some("C"), None).await.unwrap().len(), 1);
        let for_b = router.poll(Some("B"), None).await.unwrap();
        assert_eq!(for_b[0].to.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn poll_requires_user() {
        let router = SignalRouter::default();
        let err = router.poll(None, None).await.unwrap_err();
        assert_eq!(err.to_string(), "user required");
        assert!(router.poll(Some("  "), None).await.is_err());
    }

    #[tokio::test]
    async fn invalid_submission_stores_nothing() {
        let router = SignalRouter::default();
        let req = SubmitSignalRequest {
            from: None,
            to: None,
            signal: Some(SignalPayload::End),
        };
        assert!(router.submit(req).await.is_err());
        assert!(router.store().is_empty().await);
    }
}
