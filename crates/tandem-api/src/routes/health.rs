//! Health check endpoint: for load balancers, monitoring, and Docker health checks.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_secs: u64,
    /// Live envelopes in the signal store
    pending_signals: usize,
}

/// Health check router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        pending_signals: state.signals.store().len().await,
    })
}

#[cfg(test)]
mod tests {
    use crate::build_router;
    use crate::test_support::{send, state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn reports_pending_signals() {
        let app = build_router(state(None));
        let (status, body) = send(&app, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["pending_signals"], 0);
    }
}
