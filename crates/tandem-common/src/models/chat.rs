//! Chat models: message history, typing indicators, and the join gate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A chat message in the shared room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// UUID v7, so ids sort by creation time
    pub id: Uuid,

    /// Display name of the author
    pub user: String,

    pub text: String,

    /// Client-supplied send time in unix milliseconds
    pub timestamp: i64,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateMessageRequest {
    #[validate(
        required(message = "User and text are required"),
        length(min = 1, message = "User and text are required")
    )]
    pub user: Option<String>,

    #[validate(
        required(message = "User and text are required"),
        length(min = 1, message = "User and text are required")
    )]
    pub text: Option<String>,

    /// Falls back to the server clock when omitted
    pub timestamp: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: ChatMessage,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MessageListResponse {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct TypingRequest {
    #[validate(
        required(message = "User is required"),
        length(min = 1, message = "User is required")
    )]
    pub user: Option<String>,

    #[serde(default)]
    pub typing: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TypingResponse {
    pub typing_users: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct JoinRequest {
    #[validate(length(min = 1, max = 64, message = "Name must be 1-64 characters"))]
    pub user: String,

    #[serde(default)]
    pub password: String,
}

/// Generic `{ "success": true }` acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
