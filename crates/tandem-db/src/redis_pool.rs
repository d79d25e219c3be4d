//! Redis connection and helpers.

use redis::aio::ConnectionManager;
use redis::AsyncCommands;

/// Open a managed connection that reconnects on its own.
pub async fn connect(url: &str) -> Result<ConnectionManager, redis::RedisError> {
    let client = redis::Client::open(url)?;
    ConnectionManager::new(client).await
}

/// Append to a list and trim it to its newest `max_len` entries in one round trip.
pub async fn push_capped(
    conn: &mut ConnectionManager,
    key: &str,
    value: &str,
    max_len: usize,
) -> Result<(), redis::RedisError> {
    let start = -(max_len.max(1) as isize);
    redis::pipe()
        .atomic()
        .rpush(key, value)
        .ignore()
        .ltrim(key, start, -1)
        .ignore()
        .query_async(conn)
        .await
}

/// Every entry of a list, oldest first.
pub async fn list_all(conn: &mut ConnectionManager, key: &str) -> Result<Vec<String>, redis::RedisError> {
    conn.lrange(key, 0, -1).await
}

/// Delete a key.
pub async fn del(conn: &mut ConnectionManager, key: &str) -> Result<(), redis::RedisError> {
    conn.del(key).await
}
