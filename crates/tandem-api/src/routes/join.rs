//! POST /join: check the shared password before a user enters the room.

use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::WithRejection;
use std::sync::Arc;
use tandem_common::{
    error::{TandemError, TandemResult},
    models::{JoinRequest, SuccessResponse},
    validation::{require_name, validate_request},
};

use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/join", post(join))
}

async fn join(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(body), _): WithRejection<Json<JoinRequest>, TandemError>,
) -> TandemResult<Json<SuccessResponse>> {
    let user = require_name(Some(body.user.as_str()), "Name is required")?;
    validate_request(&body)?;

    if !state.join_gate.admits(&body.password) {
        tracing::info!(user = %user, "Join rejected: wrong password");
        return Err(TandemError::Unauthorized);
    }

    tracing::info!(user = %user, "User joined");
    Ok(Json(SuccessResponse::ok()))
}
