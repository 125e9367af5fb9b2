//! Chat CRUD HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/chats        - Create a chat
//! - GET    /api/v1/chats        - List the caller's chats
//! - GET    /api/v1/chats/search - Search the caller's chats by title
//! - GET    /api/v1/chats/{id}   - Get a chat
//! - PUT    /api/v1/chats/{id}   - Rename a chat
//! - DELETE /api/v1/chats/{id}   - Delete a chat and its messages

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parley_types::chat::Chat;

use crate::http::error::AppError;
use crate::http::extractors::auth::CallerIdentity;
use crate::http::handlers::owned_chat;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Body for chat create/rename.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub title: String,
}

/// Pagination query parameters. Non-positive limits fall back to the
/// service default.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

/// Query parameters for title search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

/// A page of chats plus the owner's total.
#[derive(Debug, Serialize)]
pub struct ChatListResponse {
    pub chats: Vec<Chat>,
    pub total: i64,
}

fn validated_title(raw: &str) -> Result<&str, AppError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    Ok(title)
}

/// POST /api/v1/chats - Create a chat for the caller.
pub async fn create_chat(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let title = validated_title(&req.title)?;
    let chat = state.chat_service.create_chat(&caller.0, title).await?;

    Ok(Json(ApiResponse::success(
        chat,
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}

/// GET /api/v1/chats - List the caller's chats, most recent first.
pub async fn list_chats(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<ChatListResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (chats, total) = state
        .chat_service
        .list_chats(&caller.0, query.limit, query.offset)
        .await?;

    Ok(Json(ApiResponse::success(
        ChatListResponse { chats, total },
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}

/// GET /api/v1/chats/search - Search the caller's chats by title.
pub async fn search_chats(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<ChatListResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (chats, total) = state
        .chat_service
        .search_chats(&caller.0, &query.query, query.limit, query.offset)
        .await?;

    Ok(Json(ApiResponse::success(
        ChatListResponse { chats, total },
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}

/// GET /api/v1/chats/{id} - Get one of the caller's chats.
pub async fn get_chat(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(chat_id): Path<i64>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chat = owned_chat(&state, chat_id, &caller.0).await?;

    Ok(Json(ApiResponse::success(
        chat,
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}

/// PUT /api/v1/chats/{id} - Rename one of the caller's chats.
pub async fn update_chat(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(chat_id): Path<i64>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let title = validated_title(&req.title)?;
    owned_chat(&state, chat_id, &caller.0).await?;
    let chat = state.chat_service.update_chat(chat_id, title).await?;

    Ok(Json(ApiResponse::success(
        chat,
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}

/// DELETE /api/v1/chats/{id} - Delete a chat and all of its messages.
pub async fn delete_chat(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(chat_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    owned_chat(&state, chat_id, &caller.0).await?;
    state.chat_service.delete_chat(chat_id).await?;

    Ok(Json(ApiResponse::success(
        (),
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}
