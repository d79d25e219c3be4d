//! # tandem-db
//!
//! Storage for the chat side of Tandem:
//! - **Message log**: the most recent chat messages, in-process or in Redis
//! - **Typing presence**: who is typing right now, always in-process
//!
//! Call signaling state lives in `tandem-signal`, not here.

pub mod message_log;
pub mod redis_pool;
pub mod typing;

use anyhow::Result;
use std::sync::Arc;
use tandem_common::config::AppConfig;

pub use message_log::{MemoryMessageLog, MessageLog, RedisMessageLog};
pub use typing::TypingPresence;

/// Shared chat stores passed through Axum state.
#[derive(Clone)]
pub struct Database {
    pub messages: Arc<dyn MessageLog>,
    pub typing: TypingPresence,
}

impl Database {
    /// Connect the configured backends. Without a Redis URL everything stays in-process.
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let max_messages = config.chat.max_messages;

        let messages: Arc<dyn MessageLog> = match config.redis.url.as_deref() {
            Some(url) if !url.is_empty() => {
                tracing::info!("Connecting to Redis...");
                let conn = redis_pool::connect(url).await?;
                tracing::info!("Connected to Redis");
                Arc::new(RedisMessageLog::new(conn, max_messages))
            }
            _ => {
                tracing::info!("No Redis configured, keeping chat history in memory");
                Arc::new(MemoryMessageLog::new(max_messages))
            }
        };

        Ok(Self {
            messages,
            typing: TypingPresence::new(config.chat.typing_ttl()),
        })
    }

    /// In-process stores with the given limits.
    pub fn in_memory(max_messages: usize, typing_ttl: std::time::Duration) -> Self {
        Self {
            messages: Arc::new(MemoryMessageLog::new(max_messages)),
            typing: TypingPresence::new(typing_ttl),
        }
    }
}
