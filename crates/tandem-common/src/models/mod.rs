//! Wire models shared by the Tandem server and client.
//!
//! These are the "truth" types: what the stores hold and the API serializes.

pub mod chat;
pub mod signal;

/// Re-export all model types for convenience.
pub use chat::*;
pub use signal::*;
