//! # tandem-signal
//!
//! Call signaling for Tandem: relays WebRTC offer/answer/candidate envelopes
//! between the two participants of a call over a stateless polling transport.
//!
//! Architecture:
//! ```text
//!   Peer A ──submit──▶ SignalRouter ──append──▶ SignalStore
//!   Peer B ──poll(last_id)──▶ SignalRouter ──query──▶ SignalStore
//! ```
//!
//! - Every envelope gets a strictly increasing id; peers poll with the highest
//!   id they have seen, so several candidates landing in one poll interval are
//!   all delivered, in order.
//! - Envelopes expire after the retention window. Eviction is lazy and runs on
//!   every store access; nothing is scheduled in the background.
//! - An `End` clears the sender's own trail and is then delivered like any
//!   other envelope.

pub mod router;
pub mod store;

pub use router::SignalRouter;
pub use store::SignalStore;
