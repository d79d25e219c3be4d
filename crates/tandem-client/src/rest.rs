//! Async REST client for the Tandem API.

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tandem_common::models::{
    ChatMessage, CreateMessageRequest, Envelope, EnvelopeId, JoinRequest, MessageListResponse,
    MessageResponse, PollResponse, SubmitSignalRequest, SuccessResponse, TypingRequest,
    TypingResponse,
};

use crate::error::{ClientError, Result};

const DEFAULT_BASE: &str = "http://localhost:3000/api";

/// Upper bound on a single request, so a dead connection surfaces as a
/// retryable error instead of hanging the caller.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Async Tandem REST client.
///
/// ```rust,no_run
/// use tandem_client::rest::RestClient;
///
/// #[tokio::main]
/// async fn main() -> tandem_client::Result<()> {
///     let rest = RestClient::new(None)?;
///     rest.join("alice", "hunter2").await?;
///     rest.send_message("alice", "hi!", None).await?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: Option<&str>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .default_headers({
                let mut h = reqwest::header::HeaderMap::new();
                h.insert(
                    reqwest::header::CONTENT_TYPE,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                h
            })
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.unwrap_or(DEFAULT_BASE).trim_end_matches('/').to_owned(),
        })
    }

    // ── Internal ──────────────────────────────────────────────────────────────

    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, &url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(b) = body {
            req = req.json(b);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let msg = resp
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| {
                    v.get("message")
                        .or_else(|| v.get("error"))
                        .and_then(|e| e.as_str())
                        .map(str::to_owned)
                })
                .unwrap_or_else(|| status.to_string());
            return Err(ClientError::Api { status: status.as_u16(), message: msg });
        }
        Ok(resp.json::<T>().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        self.request::<T, Value>(Method::GET, path, query, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    // ── Call signaling ────────────────────────────────────────────────────────

    pub async fn submit_signal(&self, body: &SubmitSignalRequest) -> Result<()> {
        let _: SuccessResponse = self.post("/call", body).await?;
        Ok(())
    }

    pub async fn poll_signals(&self, user: &str, last_id: Option<EnvelopeId>) -> Result<Vec<Envelope>> {
        let cursor = last_id.map(|id| id.to_string());
        let mut query = vec![("user", user)];
        if let Some(c) = cursor.as_deref() {
            query.push(("last_id", c));
        }
        let resp: PollResponse = self.get("/call", &query).await?;
        Ok(resp.signals)
    }

    // ── Chat ──────────────────────────────────────────────────────────────────

    pub async fn list_messages(&self) -> Result<Vec<ChatMessage>> {
        let resp: MessageListResponse = self.get("/messages", &[]).await?;
        Ok(resp.messages)
    }

    pub async fn send_message(&self, user: &str, text: &str, timestamp: Option<i64>) -> Result<ChatMessage> {
        let body = CreateMessageRequest {
            user: Some(user.to_owned()),
            text: Some(text.to_owned()),
            timestamp,
        };
        let resp: MessageResponse = self.post("/messages", &body).await?;
        Ok(resp.message)
    }

    pub async fn clear_messages(&self) -> Result<()> {
        let _: SuccessResponse = self.request::<_, Value>(Method::DELETE, "/messages", &[], None).await?;
        Ok(())
    }

    pub async fn set_typing(&self, user: &str, typing: bool) -> Result<()> {
        let body = TypingRequest {
            user: Some(user.to_owned()),
            typing,
        };
        let _: SuccessResponse = self.post("/typing", &body).await?;
        Ok(())
    }

    pub async fn typing_users(&self) -> Result<Vec<String>> {
        let resp: TypingResponse = self.get("/typing", &[]).await?;
        Ok(resp.typing_users)
    }

    // ── Join gate ─────────────────────────────────────────────────────────────

    pub async fn join(&self, user: &str, password: &str) -> Result<()> {
        let body = JoinRequest {
            user: user.to_owned(),
            password: password.to_owned(),
        };
        let _: SuccessResponse = self.post("/join", &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_server_is_a_transient_error() {
        // Nothing listens on the discard port.
        let rest = RestClient::with_timeout(Some("http://127.0.0.1:9/api/"), Duration::from_millis(200)).unwrap();
        assert_eq!(rest.base_url, "http://127.0.0.1:9/api");

        let err = rest.poll_signals("alice", None).await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
        assert!(err.is_transient());
    }
}
