//! Typing indicator routes.
//!
//! GET  /typing: users currently typing
//! POST /typing: `{user, typing}`; `typing: false` clears the user

use axum::{extract::State, routing::get, Json, Router};
use axum_extra::extract::WithRejection;
use std::sync::Arc;
use tandem_common::{
    error::{TandemError, TandemResult},
    models::{SuccessResponse, TypingRequest, TypingResponse},
    validation::{require_name, validate_request},
};

use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/typing", get(list_typing).post(set_typing))
}

async fn list_typing(State(state): State<Arc<AppState>>) -> Json<TypingResponse> {
    Json(TypingResponse {
        typing_users: state.db.typing.list_active().await,
    })
}

async fn set_typing(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(body), _): WithRejection<Json<TypingRequest>, TandemError>,
) -> TandemResult<Json<SuccessResponse>> {
    validate_request(&body)?;
    let user = require_name(body.user.as_deref(), "User is required")?;
    state.db.typing.set(user, body.typing).await;
    Ok(Json(SuccessResponse::ok()))
}
