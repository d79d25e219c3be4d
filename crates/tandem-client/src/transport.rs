//! The signaling seam between a call session and the server.

use async_trait::async_trait;
use tandem_common::models::{Envelope, EnvelopeId, OutboundSignal, SubmitSignalRequest};

use crate::error::Result;
use crate::rest::RestClient;

/// Submit and poll call envelopes.
///
/// [`RestClient`] is the production implementation. Anything with the same
/// cursor semantics can stand in, e.g. an in-process router.
#[async_trait]
pub trait SignalTransport: Send + Sync {
    async fn submit(&self, signal: OutboundSignal) -> Result<()>;

    /// Envelopes not sent by `user` with an id above `last_id`, ascending.
    async fn poll(&self, user: &str, last_id: Option<EnvelopeId>) -> Result<Vec<Envelope>>;
}

#[async_trait]
impl SignalTransport for RestClient {
    async fn submit(&self, signal: OutboundSignal) -> Result<()> {
        let body = SubmitSignalRequest {
            from: Some(signal.from),
            to: signal.to,
            signal: Some(signal.payload),
        };
        self.submit_signal(&body).await
    }

    async fn poll(&self, user: &str, last_id: Option<EnvelopeId>) -> Result<Vec<Envelope>> {
        self.poll_signals(user, last_id).await
    }
}
