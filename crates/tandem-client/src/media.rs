//! Platform seams for a call: local capture devices and the peer connection.
//!
//! Tandem does not ship a WebRTC stack. A host application plugs in its own
//! (browser bindings, a native library, or a test double) by implementing
//! [`MediaDevices`] and [`PeerConnector`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tandem_common::models::MediaKind;
use tokio::sync::mpsc;

use crate::error::Result;

/// Opens the camera and/or microphone.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// May wait on a user permission prompt for an arbitrarily long time.
    async fn acquire(&self, kind: MediaKind) -> Result<Box<dyn LocalMedia>>;
}

/// A live capture handle. Owned by exactly one call at a time.
pub trait LocalMedia: Send + Sync {
    fn kind(&self) -> MediaKind;

    /// Stop every track. Must be safe to call more than once.
    fn stop(&self);
}

/// Creates peer connections bound to local media.
#[async_trait]
pub trait PeerConnector: Send + Sync {
    async fn connect(
        &self,
        media: &dyn LocalMedia,
        ice_servers: &[IceServerConfig],
        events: PeerEvents,
    ) -> Result<Arc<dyn PeerConnection>>;
}

/// One negotiated point-to-point media transport.
#[async_trait]
pub trait PeerConnection: Send + Sync {
    /// Create an offer and apply it as the local description. Returns its SDP.
    async fn create_offer(&self) -> Result<String>;

    /// Create an answer to the applied remote offer and apply it locally. Returns its SDP.
    async fn create_answer(&self) -> Result<String>;

    async fn set_remote_description(&self, description: SessionDescription) -> Result<()>;

    /// Only valid once a remote description is set.
    async fn add_ice_candidate(&self, candidate: Value) -> Result<()>;

    async fn close(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionDescription {
    Offer(String),
    Answer(String),
}

/// Asynchronous notifications from a peer connection.
#[derive(Debug, Clone, PartialEq)]
pub enum PeerEvent {
    /// A local ICE candidate was gathered and should be sent to the other side.
    LocalCandidate(Value),
    /// ICE could not establish or keep connectivity.
    ConnectionFailed,
}

/// Sink a [`PeerConnection`] reports its [`PeerEvent`]s into.
///
/// Each sink is tied to the call attempt it was created for; events from an
/// abandoned attempt are dropped by the session.
#[derive(Clone)]
pub struct PeerEvents {
    attempt: u64,
    tx: mpsc::UnboundedSender<(u64, PeerEvent)>,
}

impl PeerEvents {
    pub(crate) fn new(attempt: u64, tx: mpsc::UnboundedSender<(u64, PeerEvent)>) -> Self {
        Self { attempt, tx }
    }

    pub fn local_candidate(&self, candidate: Value) {
        self.emit(PeerEvent::LocalCandidate(candidate));
    }

    pub fn connection_failed(&self) {
        self.emit(PeerEvent::ConnectionFailed);
    }

    pub fn emit(&self, event: PeerEvent) {
        // The session may already be gone; nothing to do then.
        let _ = self.tx.send((self.attempt, event));
    }
}

/// ICE server configuration handed to the peer connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServerConfig {
    /// Public STUN servers. Add TURN servers for peers behind symmetric NAT.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self {
                urls: vec![
                    "stun:stun.l.google.com:19302".into(),
                    "stun:stun1.l.google.com:19302".into(),
                ],
                username: None,
                credential: None,
            },
            Self {
                urls: vec!["stun:stun.cloudflare.com:3478".into()],
                username: None,
                credential: None,
            },
        ]
    }
}
