//! Call signaling routes: the polling transport for WebRTC negotiation.
//!
//! Routes:
//! - POST /call: submit an envelope `{from, to?, signal}`
//! - GET  /call?user=..&last_id=..: envelopes for `user` newer than `last_id`

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;
use tandem_common::{
    error::{TandemError, TandemResult},
    models::{PollQuery, PollResponse, SubmitSignalRequest, SubmitSignalResponse},
    validation::parse_cursor,
};

use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/call", get(poll_signals).post(submit_signal))
}

/// POST /call
async fn submit_signal(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(body), _): WithRejection<Json<SubmitSignalRequest>, TandemError>,
) -> TandemResult<Json<SubmitSignalResponse>> {
    let id = state.signals.submit(body).await?;
    tracing::trace!(id, "Signal accepted");
    Ok(Json(SubmitSignalResponse { success: true }))
}

/// GET /call
async fn poll_signals(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): WithRejection<Query<PollQuery>, TandemError>,
) -> TandemResult<Json<PollResponse>> {
    let last_id = parse_cursor(query.last_id.as_deref())?;
    let signals = state.signals.poll(query.user.as_deref(), last_id).await?;
    Ok(Json(PollResponse { signals }))
}
