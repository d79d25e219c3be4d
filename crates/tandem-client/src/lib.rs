//! # tandem-client
//!
//! Client side of Tandem:
//!
//! - [`rest::RestClient`] for the chat, typing, join and signaling endpoints
//! - [`call::CallHandle`], the per-peer call state machine, which drives a
//!   WebRTC negotiation over any [`transport::SignalTransport`]
//! - [`media`], the traits a host plugs its camera and peer connection into
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tandem_client::{CallConfig, CallHandle, RestClient};
//! # use tandem_client::media::{MediaDevices, PeerConnector};
//! # async fn demo(devices: Arc<dyn MediaDevices>, connector: Arc<dyn PeerConnector>) -> tandem_client::Result<()> {
//! let rest = RestClient::new(Some("http://localhost:3000/api"))?;
//! let call = CallHandle::spawn(CallConfig::new("alice"), Arc::new(rest), devices, connector);
//! call.start(tandem_common::models::MediaKind::Video).await?;
//! # Ok(())
//! # }
//! ```

pub mod call;
pub mod error;
pub mod media;
pub mod rest;
pub mod transport;

pub use call::{CallConfig, CallEvent, CallHandle, CallState};
pub use error::{ClientError, Result};
pub use rest::RestClient;
pub use transport::SignalTransport;
