//! API route modules.

pub mod call;
pub mod health;
pub mod join;
pub mod messages;
pub mod typing;
