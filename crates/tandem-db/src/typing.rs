//! Typing presence: who is typing right now.
//!
//! Entries expire after the configured TTL unless refreshed. Expired entries
//! are dropped whenever the set is read or written.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Clone)]
pub struct TypingPresence {
    /// user → last time they reported typing
    active: Arc<RwLock<HashMap<String, Instant>>>,
    ttl: Duration,
}

impl TypingPresence {
    pub fn new(ttl: Duration) -> Self {
        Self {
            active: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Mark a user as typing (refreshing their timestamp) or clear them.
    pub async fn set(&self, user: &str, is_typing: bool) {
        let now = Instant::now();
        let mut active = self.active.write().await;
        active.retain(|_, seen| now.saturating_duration_since(*seen) < self.ttl);

        if is_typing {
            active.insert(user.to_string(), now);
        } else {
            active.remove(user);
        }
    }

    /// Users whose last typing report is younger than the TTL, sorted by name.
    pub async fn list_active(&self) -> Vec<String> {
        let now = Instant::now();
        let mut active = self.active.write().await;
        active.retain(|_, seen| now.saturating_duration_since(*seen) < self.ttl);

        let mut users: Vec<String> = active.keys().cloned().collect();
        users.sort();
        users
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let typing = TypingPresence::new(Duration::from_secs(3));
        typing.set("alice", true).await;
        assert_eq!(typing.list_active().await, vec!["alice"]);

        tokio::time::advance(Duration::from_millis(2999)).await;
        assert_eq!(typing.list_active().await, vec!["alice"]);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(typing.list_active().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn refreshing_extends_presence() {
        let typing = TypingPresence::new(Duration::from_secs(3));
        typing.set("alice", true).await;
        tokio::time::advance(Duration::from_secs(2)).await;
        typing.set("alice", true).await;
        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(typing.list_active().await, vec!["alice"]);
    }

    #[tokio::test]
    async fn stop_typing_removes_user() {
        let typing = TypingPresence::new(Duration::from_secs(3));
        typing.set("alice", true).await;
        typing.set("bob", true).await;
        typing.set("alice", false).await;
        assert_eq!(typing.list_active().await, vec!["bob"]);
    }
}
