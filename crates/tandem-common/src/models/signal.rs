//! Call signaling models: envelopes relayed between the two peers of a call.
//!
//! An [`Envelope`] is one signaling message: who sent it, who it is meant for,
//! and the [`SignalPayload`] itself. Envelopes are numbered by the server at
//! insertion time; clients use the highest id they have seen as a cursor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sequence id assigned by the signal store. Strictly increasing, never reused.
pub type EnvelopeId = u64;

/// Which media a call carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Audio,
    Video,
}

/// The signaling message carried by an envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalPayload {
    /// Caller's session description.
    Offer { sdp: String, media_kind: MediaKind },

    /// Callee's session description.
    Answer { sdp: String },

    /// One ICE candidate, passed through untouched.
    Candidate {
        #[serde(rename = "candidate")]
        ice_candidate: serde_json::Value,
    },

    /// Hang up, reject, or cancel.
    End,
}

impl SignalPayload {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SignalPayload::Offer { .. } => "offer",
            SignalPayload::Answer { .. } => "answer",
            SignalPayload::Candidate { .. } => "candidate",
            SignalPayload::End => "end",
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, SignalPayload::End)
    }
}

/// A stored signaling message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub id: EnvelopeId,

    /// Sender's display name
    pub from: String,

    /// Addressed recipient. Carried along but not used for routing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    #[serde(rename = "signal")]
    pub payload: SignalPayload,

    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// An envelope before the store has numbered and stamped it.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundSignal {
    pub from: String,
    pub to: Option<String>,
    pub payload: SignalPayload,
}

// ============================================================
// HTTP bodies
// ============================================================

/// `POST /call` body. Every field is optional on the wire so that missing
/// fields surface as a validation error rather than a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitSignalRequest {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default)]
    pub signal: Option<SignalPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitSignalResponse {
    pub success: bool,
}

/// `GET /call` query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollQuery {
    #[serde(default)]
    pub user: Option<String>,
    /// Highest envelope id already seen, as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollResponse {
    pub signals: Vec<Envelope>,
}
