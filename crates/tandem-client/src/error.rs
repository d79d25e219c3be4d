//! Error types for the Tandem client.

use thiserror::Error;

use crate::call::CallState;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP response had a non-2xx status code.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// An error from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Camera or microphone could not be opened.
    #[error("Media error: {0}")]
    Media(String),

    /// The peer connection refused a description or candidate.
    #[error("Negotiation error: {0}")]
    Negotiation(String),

    /// A user action that the current call state does not allow.
    #[error("Cannot {action} while {state:?}")]
    InvalidState { action: &'static str, state: CallState },

    /// The call session task has stopped.
    #[error("Call session is closed")]
    SessionClosed,
}

impl ClientError {
    /// Network and device failures that the next poll tick or a retry may clear.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Media(_))
            || matches!(self, Self::Api { status, .. } if *status >= 500)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
