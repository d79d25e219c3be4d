//! # tandem-api
//!
//! HTTP layer for Tandem. Every endpoint is plain request/response JSON; the
//! clients poll, nothing is pushed.
//!
//! - `/api/call`    : submit and poll call signaling envelopes
//! - `/api/messages`: chat history
//! - `/api/typing`  : typing indicators
//! - `/api/join`    : the shared-password join gate
//! - `/api/health`  : liveness and store stats

pub mod gate;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tandem_common::config::AppConfig;
use tandem_db::Database;
use tandem_signal::SignalRouter;

use crate::gate::JoinGate;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// Call signaling. One router per process; both peers go through it.
    pub signals: SignalRouter,
    pub join_gate: JoinGate,
    /// Longest chat message accepted, in characters.
    pub max_message_length: usize,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(db: Database, config: &AppConfig) -> Self {
        Self {
            db,
            signals: SignalRouter::with_limits(
                config.signaling.retention(),
                config.signaling.max_envelopes,
            ),
            join_gate: JoinGate::new(config.join.password.clone()),
            max_message_length: config.chat.max_message_length,
            started_at: Instant::now(),
        }
    }
}

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(routes::call::router())
        .merge(routes::messages::router())
        .merge(routes::typing::router())
        .merge(routes::join::router())
        .merge(routes::health::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::compression::CompressionLayer::new())
        .with_state(Arc::new(state))
}
