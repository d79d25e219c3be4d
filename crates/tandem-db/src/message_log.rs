//! Chat message log: keeps the most recent messages, oldest evicted first.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::collections::VecDeque;
use std::sync::Arc;
use tandem_common::error::{TandemError, TandemResult};
use tandem_common::models::ChatMessage;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::redis_pool;

const MESSAGES_KEY: &str = "chat:messages";

/// Append/list/clear over timestamped chat records.
#[async_trait]
pub trait MessageLog: Send + Sync {
    /// Store a message and return the stored record.
    async fn append(&self, user: String, text: String, timestamp: i64) -> TandemResult<ChatMessage>;

    /// All retained messages, oldest first.
    async fn list(&self) -> TandemResult<Vec<ChatMessage>>;

    async fn clear(&self) -> TandemResult<()>;
}

fn new_record(user: String, text: String, timestamp: i64) -> ChatMessage {
    ChatMessage {
        id: Uuid::now_v7(),
        user,
        text,
        timestamp,
    }
}

// ============================================================
// In-process
// ============================================================

#[derive(Clone)]
pub struct MemoryMessageLog {
    messages: Arc<RwLock<VecDeque<ChatMessage>>>,
    max_messages: usize,
}

impl MemoryMessageLog {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: Arc::new(RwLock::new(VecDeque::new())),
            max_messages: max_messages.max(1),
        }
    }
}

#[async_trait]
impl MessageLog for MemoryMessageLog {
    async fn append(&self, user: String, text: String, timestamp: i64) -> TandemResult<ChatMessage> {
        let message = new_record(user, text, timestamp);
        let mut messages = self.messages.write().await;
        messages.push_back(message.clone());
        while messages.len() > self.max_messages {
            messages.pop_front();
        }
        Ok(message)
    }

    async fn list(&self) -> TandemResult<Vec<ChatMessage>> {
        Ok(self.messages.read().await.iter().cloned().collect())
    }

    async fn clear(&self) -> TandemResult<()> {
        self.messages.write().await.clear();
        Ok(())
    }
}

// ============================================================
// Redis
// ============================================================

/// Messages stored as a Redis list of JSON records under `chat:messages`.
#[derive(Clone)]
pub struct RedisMessageLog {
    conn: ConnectionManager,
    max_messages: usize,
}

impl RedisMessageLog {
    pub fn new(conn: ConnectionManager, max_messages: usize) -> Self {
        Self { conn, max_messages }
    }
}

#[async_trait]
impl MessageLog for RedisMessageLog {
    async fn append(&self, user: String, text: String, timestamp: i64) -> TandemResult<ChatMessage> {
        let message = new_record(user, text, timestamp);
        let json = serde_json::to_string(&message).map_err(|e| TandemError::Internal(e.into()))?;
        let mut conn = self.conn.clone();
        redis_pool::push_capped(&mut conn, MESSAGES_KEY, &json, self.max_messages).await?;
        Ok(message)
    }

    async fn list(&self) -> TandemResult<Vec<ChatMessage>> {
        let mut conn = self.conn.clone();
        let raw = redis_pool::list_all(&mut conn, MESSAGES_KEY).await?;
        let messages = raw
            .iter()
            .filter_map(|entry| match serde_json::from_str::<ChatMessage>(entry) {
                Ok(m) => Some(m),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed chat record");
                    None
                }
            })
            .collect();
        Ok(messages)
    }

    async fn clear(&self) -> TandemResult<()> {
        let mut conn = self.conn.clone();
        redis_pool::del(&mut conn, MESSAGES_KEY).await?;
        Ok(())
    }
}
