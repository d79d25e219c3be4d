//! Chat message routes.
//!
//! GET    /messages: the retained history, oldest first
//! POST   /messages: append `{user, text, timestamp?}`
//! DELETE /messages: wipe the history

use axum::{extract::State, routing::get, Json, Router};
use axum_extra::extract::WithRejection;
use std::sync::Arc;
use tandem_common::{
    error::{TandemError, TandemResult},
    models::{CreateMessageRequest, MessageListResponse, MessageResponse, SuccessResponse},
    validation::validate_request,
};

use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/messages",
        get(list_messages).post(create_message).delete(clear_messages),
    )
}

async fn list_messages(State(state): State<Arc<AppState>>) -> TandemResult<Json<MessageListResponse>> {
    let messages = state.db.messages.list().await?;
    Ok(Json(MessageListResponse { messages }))
}

async fn create_message(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(body), _): WithRejection<Json<CreateMessageRequest>, TandemError>,
) -> TandemResult<Json<MessageResponse>> {
    validate_request(&body)?;

    let (Some(user), Some(text)) = (body.user, body.text) else {
        return Err(TandemError::validation("User and text are required"));
    };
    if text.chars().count() > state.max_message_length {
        return Err(TandemError::validation(format!(
            "Message must be at most {} characters",
            state.max_message_length
        )));
    }

    let timestamp = body
        .timestamp
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
    let message = state.db.messages.append(user, text, timestamp).await?;

    tracing::debug!(id = %message.id, user = %message.user, "Chat message stored");
    Ok(Json(MessageResponse { message }))
}

async fn clear_messages(State(state): State<Arc<AppState>>) -> TandemResult<Json<SuccessResponse>> {
    state.db.messages.clear().await?;
    tracing::info!("Chat history cleared");
    Ok(Json(SuccessResponse::ok()))
}
