//! Per-peer call state machine.
//!
//! ```text
//!   caller:  Idle ──start──▶ Calling ──remote answer──▶ Connected ──▶ Idle
//!   callee:  Idle ──offer──▶ Incoming ──answer──────────▶ Connected ──▶ Idle
//!            any ──End / end / reject / ICE failure──▶ Idle
//! ```
//!
//! A session task owns all call state. It is driven by user commands from
//! [`CallHandle`]s, a fixed-interval poll of the signal transport, and
//! completions of the slow setup work (media acquisition and local description
//! creation). Nothing slow runs on the session loop itself: setup runs in
//! spawned tasks, each poll runs in its own task, and outgoing envelopes go
//! through an ordered outbox drained by a delivery task. A stalled server or a
//! pending permission prompt never delays `end`.
//!
//! Every teardown starts a new call attempt. Setup results and peer events are
//! tagged with the attempt they belong to; anything from an abandoned attempt
//! is released instead of applied.

use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tandem_common::models::{Envelope, EnvelopeId, MediaKind, OutboundSignal, SignalPayload};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::{ClientError, Result};
use crate::media::{
    IceServerConfig, LocalMedia, MediaDevices, PeerConnection, PeerConnector, PeerEvent, PeerEvents,
    SessionDescription,
};
use crate::transport::SignalTransport;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

const EVENT_CAPACITY: usize = 64;
const COMMAND_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallState {
    Idle,
    Calling,
    Incoming,
    Connected,
}

/// What a UI layer is told about.
#[derive(Debug, Clone, PartialEq)]
pub enum CallEvent {
    StateChanged(CallState),
    /// The other side is ringing us.
    IncomingCall { from: String, media_kind: MediaKind },
    /// A user-visible message (media failure, lost connection, peer hung up).
    Notice(String),
}

#[derive(Debug, Clone)]
pub struct CallConfig {
    /// Our name on the signal channel. Envelopes from this name are ignored.
    pub identity: String,
    pub poll_interval: Duration,
    pub ice_servers: Vec<IceServerConfig>,
}

impl CallConfig {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            ice_servers: IceServerConfig::defaults(),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_ice_servers(mut self, servers: Vec<IceServerConfig>) -> Self {
        self.ice_servers = servers;
        self
    }
}

// ============================================================
// Handle
// ============================================================

#[derive(Debug)]
enum Command {
    Start { kind: MediaKind, reply: oneshot::Sender<Result<()>> },
    Answer { reply: oneshot::Sender<Result<()>> },
    End { reply: oneshot::Sender<Result<()>> },
    Reject { reply: oneshot::Sender<Result<()>> },
    Shutdown { reply: oneshot::Sender<()> },
}

/// Cheap, cloneable handle to a running call session.
///
/// User actions return once the session has accepted them. Their outcome
/// (connected, failed, hung up) is observed through [`CallHandle::state_changes`]
/// and [`CallHandle::subscribe`].
#[derive(Clone)]
pub struct CallHandle {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<CallState>,
    events: broadcast::Sender<CallEvent>,
}

impl CallHandle {
    /// Spawn a session task on the current runtime.
    pub fn spawn(
        config: CallConfig,
        transport: Arc<dyn SignalTransport>,
        devices: Arc<dyn MediaDevices>,
        connector: Arc<dyn PeerConnector>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (state_tx, state_rx) = watch::channel(CallState::Idle);
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (peer_tx, peer_rx) = mpsc::unbounded_channel();
        let (net_tx, net_rx) = mpsc::unbounded_channel();
        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();

        tokio::spawn(deliver(transport.clone(), outbox_rx, net_tx.clone()));

        let session = CallSession {
            config,
            transport,
            devices,
            connector,
            state: CallState::Idle,
            state_tx,
            events: events_tx.clone(),
            last_id: None,
            attempt: 0,
            setup_in_flight: false,
            media: None,
            peer: None,
            remote_offer: None,
            remote_peer: None,
            remote_description_set: false,
            pending_candidates: VecDeque::new(),
            local_description_sent: false,
            outbound_candidates: VecDeque::new(),
            completion_tx,
            peer_tx,
            net_tx,
            outbox: outbox_tx,
            poll_task: None,
        };
        tokio::spawn(session.run(cmd_rx, completion_rx, peer_rx, net_rx));

        Self {
            commands: cmd_tx,
            state: state_rx,
            events: events_tx,
        }
    }

    /// Place a call. Only valid while idle.
    pub async fn start(&self, kind: MediaKind) -> Result<()> {
        self.request(|reply| Command::Start { kind, reply }).await
    }

    /// Accept the ringing call. Only valid while incoming.
    pub async fn answer(&self) -> Result<()> {
        self.request(|reply| Command::Answer { reply }).await
    }

    /// Hang up or cancel. A no-op while idle.
    pub async fn end(&self) -> Result<()> {
        self.request(|reply| Command::End { reply }).await
    }

    /// Decline the ringing call. A no-op while idle.
    pub async fn reject(&self) -> Result<()> {
        self.request(|reply| Command::Reject { reply }).await
    }

    pub fn state(&self) -> CallState {
        *self.state.borrow()
    }

    pub fn state_changes(&self) -> watch::Receiver<CallState> {
        self.state.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CallEvent> {
        self.events.subscribe()
    }

    /// Stop the session task. Local media is released; no `End` is sent.
    pub async fn shutdown(&self) {
        let (reply, rx) = oneshot::channel();
        if self.commands.send(Command::Shutdown { reply }).await.is_ok() {
            let _ = rx.await;
        }
    }

    async fn request(&self, make: impl FnOnce(oneshot::Sender<Result<()>>) -> Command) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_| ClientError::SessionClosed)?;
        rx.await.map_err(|_| ClientError::SessionClosed)?
    }
}

// ============================================================
// Session
// ============================================================

/// An offer we have been sent but not yet answered.
#[derive(Debug, Clone)]
struct RemoteOffer {
    from: String,
    sdp: String,
    media_kind: MediaKind,
}

#[derive(Debug, Clone, Copy)]
enum Role {
    Caller(MediaKind),
    Callee,
}

struct Prepared {
    media: Box<dyn LocalMedia>,
    peer: Arc<dyn PeerConnection>,
    sdp: String,
}

struct SetupFailure {
    error: ClientError,
    media: Option<Box<dyn LocalMedia>>,
    peer: Option<Arc<dyn PeerConnection>>,
}

struct Completion {
    attempt: u64,
    role: Role,
    outcome: std::result::Result<Prepared, SetupFailure>,
}

/// Results of network I/O running off the session loop.
enum NetEvent {
    Polled(Result<Vec<Envelope>>),
    SendFailed {
        attempt: u64,
        kind: &'static str,
        error: ClientError,
    },
}

/// An envelope queued for delivery, tagged with the call attempt that sent it.
struct Outgoing {
    attempt: u64,
    signal: OutboundSignal,
}

/// Everything a spawned setup task needs.
struct SetupContext {
    devices: Arc<dyn MediaDevices>,
    connector: Arc<dyn PeerConnector>,
    ice_servers: Vec<IceServerConfig>,
    events: PeerEvents,
}

struct CallSession {
    config: CallConfig,
    transport: Arc<dyn SignalTransport>,
    devices: Arc<dyn MediaDevices>,
    connector: Arc<dyn PeerConnector>,

    state: CallState,
    state_tx: watch::Sender<CallState>,
    events: broadcast::Sender<CallEvent>,

    /// Highest envelope id processed.
    last_id: Option<EnvelopeId>,
    /// Bumped on every teardown.
    attempt: u64,
    setup_in_flight: bool,

    media: Option<Box<dyn LocalMedia>>,
    peer: Option<Arc<dyn PeerConnection>>,
    remote_offer: Option<RemoteOffer>,
    /// Who we are talking to; used as `to` on outgoing envelopes.
    remote_peer: Option<String>,
    remote_description_set: bool,
    /// Remote candidates waiting for the remote description, in arrival order.
    pending_candidates: VecDeque<Value>,
    local_description_sent: bool,
    /// Local candidates gathered before our offer/answer went out.
    outbound_candidates: VecDeque<Value>,

    completion_tx: mpsc::UnboundedSender<Completion>,
    peer_tx: mpsc::UnboundedSender<(u64, PeerEvent)>,
    net_tx: mpsc::UnboundedSender<NetEvent>,
    outbox: mpsc::UnboundedSender<Outgoing>,
    /// At most one poll is in flight.
    poll_task: Option<JoinHandle<()>>,
}

impl CallSession {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
        mut peer_events: mpsc::UnboundedReceiver<(u64, PeerEvent)>,
        mut net_events: mpsc::UnboundedReceiver<NetEvent>,
    ) {
        let mut ticker = tokio::time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::debug!(identity = %self.config.identity, "Call session started");

        loop {
            tokio::select! {
                cmd = commands.recv() => {
                    match cmd {
                        Some(Command::Shutdown { reply }) => {
                            self.teardown(false).await;
                            let _ = reply.send(());
                            break;
                        }
                        Some(cmd) => self.handle_command(cmd).await,
                        // Every handle dropped
                        None => {
                            self.teardown(false).await;
                            break;
                        }
                    }
                }
                _ = ticker.tick() => self.start_poll(),
                Some(event) = net_events.recv() => self.handle_net_event(event).await,
                Some(done) = completions.recv() => self.handle_completion(done).await,
                Some((attempt, event)) = peer_events.recv() => self.handle_peer_event(attempt, event).await,
            }
        }

        if let Some(task) = self.poll_task.take() {
            task.abort();
        }

        tracing::debug!(identity = %self.config.identity, "Call session stopped");
    }

    // ── User actions ────────────────────────────────────────────────────────

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Start { kind, reply } => {
                let _ = reply.send(self.start(kind));
            }
            Command::Answer { reply } => {
                let _ = reply.send(self.answer());
            }
            Command::End { reply } | Command::Reject { reply } => {
                if self.is_active() {
                    self.teardown(true).await;
                }
                let _ = reply.send(Ok(()));
            }
            Command::Shutdown { reply } => {
                let _ = reply.send(());
            }
        }
    }

    fn start(&mut self, kind: MediaKind) -> Result<()> {
        if self.state != CallState::Idle || self.setup_in_flight {
            return Err(ClientError::InvalidState { action: "start", state: self.state });
        }

        // Leftovers from a call that never reached us.
        self.pending_candidates.clear();
        self.setup_in_flight = true;
        self.set_state(CallState::Calling);
        self.spawn_setup(Role::Caller(kind), kind, None);
        tracing::info!(identity = %self.config.identity, ?kind, "Placing call");
        Ok(())
    }

    fn answer(&mut self) -> Result<()> {
        let offer = match (&self.state, &self.remote_offer) {
            (CallState::Incoming, Some(offer)) if !self.setup_in_flight => offer.clone(),
            _ => return Err(ClientError::InvalidState { action: "answer", state: self.state }),
        };

        self.setup_in_flight = true;
        self.spawn_setup(Role::Callee, offer.media_kind, Some(offer.sdp));
        tracing::info!(identity = %self.config.identity, from = %offer.from, "Answering call");
        Ok(())
    }

    fn spawn_setup(&self, role: Role, kind: MediaKind, remote_offer: Option<String>) {
        let ctx = SetupContext {
            devices: self.devices.clone(),
            connector: self.connector.clone(),
            ice_servers: self.config.ice_servers.clone(),
            events: PeerEvents::new(self.attempt, self.peer_tx.clone()),
        };
        let attempt = self.attempt;
        let done = self.completion_tx.clone();

        tokio::spawn(async move {
            let outcome = prepare(ctx, kind, remote_offer).await;
            let _ = done.send(Completion { attempt, role, outcome });
        });
    }

    // ── Signal channel ──────────────────────────────────────────────────────

    fn start_poll(&mut self) {
        if self.poll_task.as_ref().is_some_and(|task| !task.is_finished()) {
            tracing::trace!(identity = %self.config.identity, "Previous poll still in flight");
            return;
        }

        let transport = self.transport.clone();
        let identity = self.config.identity.clone();
        let last_id = self.last_id;
        let net = self.net_tx.clone();
        self.poll_task = Some(tokio::spawn(async move {
            let result = transport.poll(&identity, last_id).await;
            let _ = net.send(NetEvent::Polled(result));
        }));
    }

    async fn handle_net_event(&mut self, event: NetEvent) {
        match event {
            NetEvent::Polled(Ok(envelopes)) => {
                for envelope in envelopes {
                    self.handle_envelope(envelope).await;
                }
            }
            // Retried on the next tick.
            NetEvent::Polled(Err(e)) if e.is_transient() => {
                tracing::debug!(identity = %self.config.identity, error = %e, "Signal poll failed, retrying");
            }
            NetEvent::Polled(Err(e)) => {
                tracing::warn!(identity = %self.config.identity, error = %e, "Signal poll rejected");
            }
            NetEvent::SendFailed { attempt, kind, error } => {
                tracing::warn!(identity = %self.config.identity, kind, error = %error, "Failed to send signal");
                if attempt != self.attempt {
                    return;
                }
                // Without its offer or answer the other side never learns of the call.
                match kind {
                    "offer" => {
                        self.notice(format!("Could not reach the server: {error}"));
                        self.teardown(false).await;
                    }
                    "answer" => {
                        self.notice(format!("Could not reach the server: {error}"));
                        self.teardown(true).await;
                    }
                    _ => {}
                }
            }
        }
    }

    async fn handle_envelope(&mut self, envelope: Envelope) {
        if envelope.from == self.config.identity {
            return;
        }
        if self.last_id.is_some_and(|last| envelope.id <= last) {
            return;
        }
        self.last_id = Some(envelope.id);

        tracing::trace!(id = envelope.id, from = %envelope.from, kind = envelope.payload.kind(), "Signal received");

        match envelope.payload {
            SignalPayload::Offer { sdp, media_kind } => {
                if self.state != CallState::Idle || self.setup_in_flight {
                    tracing::debug!(from = %envelope.from, state = ?self.state, "Ignoring offer while busy");
                    return;
                }
                self.remote_peer = Some(envelope.from.clone());
                self.remote_offer = Some(RemoteOffer {
                    from: envelope.from.clone(),
                    sdp,
                    media_kind,
                });
                self.set_state(CallState::Incoming);
                self.emit(CallEvent::IncomingCall { from: envelope.from, media_kind });
            }
            SignalPayload::Answer { sdp } => {
                let peer = match (&self.state, &self.peer) {
                    (CallState::Calling, Some(peer)) if !self.remote_description_set => peer.clone(),
                    _ => {
                        tracing::debug!(from = %envelope.from, state = ?self.state, "Ignoring unexpected answer");
                        return;
                    }
                };
                if let Err(e) = peer.set_remote_description(SessionDescription::Answer(sdp)).await {
                    tracing::warn!(error = %e, "Remote answer rejected");
                    self.notice(format!("Call failed: {e}"));
                    self.teardown(true).await;
                    return;
                }
                self.remote_peer = Some(envelope.from);
                self.remote_description_set = true;
                self.drain_pending_candidates().await;
                self.set_state(CallState::Connected);
            }
            SignalPayload::Candidate { ice_candidate } => {
                let ready = if self.remote_description_set { self.peer.clone() } else { None };
                match ready {
                    Some(peer) => {
                        if let Err(e) = peer.add_ice_candidate(ice_candidate).await {
                            tracing::warn!(error = %e, "Failed to add ICE candidate");
                        }
                    }
                    None => self.pending_candidates.push_back(ice_candidate),
                }
            }
            SignalPayload::End => {
                if self.is_active() {
                    tracing::info!(identity = %self.config.identity, from = %envelope.from, "Call ended by peer");
                    self.notice(format!("{} ended the call", envelope.from));
                    self.teardown(false).await;
                } else {
                    self.pending_candidates.clear();
                }
            }
        }
    }

    async fn drain_pending_candidates(&mut self) {
        let Some(peer) = self.peer.clone() else {
            return;
        };
        while let Some(candidate) = self.pending_candidates.pop_front() {
            if let Err(e) = peer.add_ice_candidate(candidate).await {
                tracing::warn!(error = %e, "Failed to add queued ICE candidate");
            }
        }
    }

    // ── Setup completions ───────────────────────────────────────────────────

    async fn handle_completion(&mut self, done: Completion) {
        if done.attempt != self.attempt {
            tracing::debug!(attempt = done.attempt, "Releasing media from an abandoned call");
            match done.outcome {
                Ok(prepared) => release(Some(prepared.media), Some(prepared.peer)).await,
                Err(failure) => release(failure.media, failure.peer).await,
            }
            return;
        }
        self.setup_in_flight = false;

        let prepared = match done.outcome {
            Ok(prepared) => prepared,
            Err(failure) => {
                release(failure.media, failure.peer).await;
                tracing::warn!(identity = %self.config.identity, error = %failure.error, "Call setup failed");
                self.notice(describe_setup_failure(&failure.error));
                // The caller has not told anyone yet; the callee owes the caller an End.
                self.teardown(matches!(done.role, Role::Callee)).await;
                return;
            }
        };

        self.media = Some(prepared.media);
        self.peer = Some(prepared.peer);

        match done.role {
            Role::Caller(media_kind) => {
                self.send(SignalPayload::Offer { sdp: prepared.sdp, media_kind });
                self.local_description_sent = true;
                self.flush_outbound_candidates();
            }
            Role::Callee => {
                self.remote_description_set = true;
                self.send(SignalPayload::Answer { sdp: prepared.sdp });
                self.local_description_sent = true;
                self.flush_outbound_candidates();
                self.drain_pending_candidates().await;
                self.remote_offer = None;
                self.set_state(CallState::Connected);
            }
        }
    }

    // ── Peer connection events ──────────────────────────────────────────────

    async fn handle_peer_event(&mut self, attempt: u64, event: PeerEvent) {
        if attempt != self.attempt {
            return;
        }
        match event {
            PeerEvent::LocalCandidate(candidate) => {
                if self.local_description_sent {
                    self.send_candidate(candidate);
                } else {
                    self.outbound_candidates.push_back(candidate);
                }
            }
            PeerEvent::ConnectionFailed => {
                if self.is_active() {
                    tracing::warn!(identity = %self.config.identity, "Peer connection failed");
                    self.notice("Connection lost".to_string());
                    self.teardown(false).await;
                }
            }
        }
    }

    fn flush_outbound_candidates(&mut self) {
        while let Some(candidate) = self.outbound_candidates.pop_front() {
            self.send_candidate(candidate);
        }
    }

    fn send_candidate(&self, candidate: Value) {
        self.send(SignalPayload::Candidate { ice_candidate: candidate });
    }

    // ── Helpers ─────────────────────────────────────────────────────────────

    fn is_active(&self) -> bool {
        self.state != CallState::Idle || self.setup_in_flight
    }

    /// Release everything the current call holds and return to `Idle`.
    async fn teardown(&mut self, send_end: bool) {
        self.attempt += 1;
        self.setup_in_flight = false;

        release(self.media.take(), self.peer.take()).await;

        self.remote_offer = None;
        self.remote_description_set = false;
        self.pending_candidates.clear();
        self.local_description_sent = false;
        self.outbound_candidates.clear();

        if send_end {
            self.send(SignalPayload::End);
        }
        self.remote_peer = None;
        self.set_state(CallState::Idle);
    }

    /// Queue an envelope for delivery. Delivery order is queue order.
    fn send(&self, payload: SignalPayload) {
        tracing::trace!(identity = %self.config.identity, kind = payload.kind(), "Queueing signal");
        let outgoing = Outgoing {
            attempt: self.attempt,
            signal: OutboundSignal {
                from: self.config.identity.clone(),
                to: self.remote_peer.clone(),
                payload,
            },
        };
        if self.outbox.send(outgoing).is_err() {
            tracing::warn!(identity = %self.config.identity, "Signal outbox closed");
        }
    }

    fn set_state(&mut self, state: CallState) {
        if self.state == state {
            return;
        }
        tracing::debug!(identity = %self.config.identity, from = ?self.state, to = ?state, "Call state changed");
        self.state = state;
        self.state_tx.send_replace(state);
        self.emit(CallEvent::StateChanged(state));
    }

    fn notice(&self, message: String) {
        self.emit(CallEvent::Notice(message));
    }

    fn emit(&self, event: CallEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

/// Submit queued envelopes one at a time, in order, until the session goes away.
async fn deliver(
    transport: Arc<dyn SignalTransport>,
    mut outbox: mpsc::UnboundedReceiver<Outgoing>,
    net: mpsc::UnboundedSender<NetEvent>,
) {
    while let Some(Outgoing { attempt, signal }) = outbox.recv().await {
        let kind = signal.payload.kind();
        if let Err(error) = transport.submit(signal).await {
            let _ = net.send(NetEvent::SendFailed { attempt, kind, error });
        }
    }
}

/// Acquire media, open a peer connection and produce our session description.
async fn prepare(
    ctx: SetupContext,
    kind: MediaKind,
    remote_offer: Option<String>,
) -> std::result::Result<Prepared, SetupFailure> {
    let media = ctx.devices.acquire(kind).await.map_err(|error| SetupFailure {
        error,
        media: None,
        peer: None,
    })?;

    let peer = match ctx.connector.connect(media.as_ref(), &ctx.ice_servers, ctx.events).await {
        Ok(peer) => peer,
        Err(error) => {
            return Err(SetupFailure {
                error,
                media: Some(media),
                peer: None,
            });
        }
    };

    let sdp = match remote_offer {
        None => peer.create_offer().await,
        Some(offer) => match peer.set_remote_description(SessionDescription::Offer(offer)).await {
            Ok(()) => peer.create_answer().await,
            Err(e) => Err(e),
        },
    };

    match sdp {
        Ok(sdp) => Ok(Prepared { media, peer, sdp }),
        Err(error) => Err(SetupFailure {
            error,
            media: Some(media),
            peer: Some(peer),
        }),
    }
}

async fn release(media: Option<Box<dyn LocalMedia>>, peer: Option<Arc<dyn PeerConnection>>) {
    if let Some(media) = media {
        media.stop();
    }
    if let Some(peer) = peer {
        peer.close().await;
    }
}

fn describe_setup_failure(error: &ClientError) -> String {
    match error {
        ClientError::Media(reason) => format!("Could not access camera/microphone: {reason}"),
        other => format!("Call setup failed: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_config_defaults() {
        let config = CallConfig::new("alice");
        assert_eq!(config.identity, "alice");
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert!(!config.ice_servers.is_empty());

        let config = config.with_poll_interval(Duration::from_millis(100)).with_ice_servers(vec![]);
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert!(config.ice_servers.is_empty());
    }

    #[test]
    fn setup_failure_notice_names_the_device_problem() {
        let msg = describe_setup_failure(&ClientError::Media("permission denied".into()));
        assert_eq!(msg, "Could not access camera/microphone: permission denied");

        let msg = describe_setup_failure(&ClientError::Negotiation("bad sdp".into()));
        assert!(msg.starts_with("Call setup failed"));
    }

    #[test]
    fn invalid_state_error_reads_naturally() {
        let err = ClientError::InvalidState { action: "answer", state: CallState::Idle };
        assert_eq!(err.to_string(), "Cannot answer while Idle");
    }
}
