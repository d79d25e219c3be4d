//! # tandem-common
//!
//! Shared types, configuration, error handling, and validation used across all Tandem crates.
//! No business logic lives here, just the wire contracts the server and client agree on.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;
