//! Message HTTP handlers, including the send-message exchange.
//!
//! Endpoints:
//! - POST   /api/v1/chats/{id}/messages - Send a message, get a model reply
//! - GET    /api/v1/chats/{id}/messages - List a chat's messages
//! - GET    /api/v1/messages/{id}       - Get a message
//! - PUT    /api/v1/messages/{id}       - Edit a user message
//! - DELETE /api/v1/messages/{id}       - Delete a message

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parley_types::chat::Message;

use crate::http::error::AppError;
use crate::http::extractors::auth::CallerIdentity;
use crate::http::handlers::chat::PageQuery;
use crate::http::handlers::owned_chat;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Body for send/edit message.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub content: String,
}

/// A page of messages plus the chat's total.
#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    pub messages: Vec<Message>,
    pub total: i64,
}

fn validated_content(raw: &str) -> Result<&str, AppError> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(AppError::Validation(
            "content must not be empty".to_string(),
        ));
    }
    Ok(content)
}

/// POST /api/v1/chats/{id}/messages - Send a user message.
///
/// Returns the persisted user turn; the model reply is fetched via the
/// list endpoint. A 503 response means the user turn may have been
/// recorded without a reply -- re-fetch history rather than retry.
pub async fn send_message(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(chat_id): Path<i64>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<ApiResponse<Message>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let content = validated_content(&req.content)?;

    // Ownership is the exchange sequence's own first step; no boundary
    // check here.
    let message = state
        .message_service
        .send_message(chat_id, &caller.0, content)
        .await?;

    Ok(Json(ApiResponse::success(
        message,
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}

/// GET /api/v1/chats/{id}/messages - List a chat's messages in order.
pub async fn list_messages(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(chat_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<MessageListResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    owned_chat(&state, chat_id, &caller.0).await?;
    let (messages, total) = state
        .message_service
        .list_messages(chat_id, query.limit, query.offset)
        .await?;

    Ok(Json(ApiResponse::success(
        MessageListResponse { messages, total },
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}

/// GET /api/v1/messages/{id} - Get a message from one of the caller's chats.
pub async fn get_message(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(message_id): Path<i64>,
) -> Result<Json<ApiResponse<Message>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let message = state.message_service.get_message(message_id).await?;
    owned_chat(&state, message.chat_id, &caller.0).await?;

    Ok(Json(ApiResponse::success(
        message,
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}

/// PUT /api/v1/messages/{id} - Edit a user message's content.
///
/// Assistant messages cannot be edited; the service rejects them.
pub async fn update_message(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(message_id): Path<i64>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<ApiResponse<Message>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let content = validated_content(&req.content)?;

    let message = state.message_service.get_message(message_id).await?;
    owned_chat(&state, message.chat_id, &caller.0).await?;

    let updated = state
        .message_service
        .update_message(message_id, content)
        .await?;

    Ok(Json(ApiResponse::success(
        updated,
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}

/// DELETE /api/v1/messages/{id} - Delete a message.
pub async fn delete_message(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(message_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let message = state.message_service.get_message(message_id).await?;
    owned_chat(&state, message.chat_id, &caller.0).await?;
    state.message_service.delete_message(message_id).await?;

    Ok(Json(ApiResponse::success(
        (),
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}
