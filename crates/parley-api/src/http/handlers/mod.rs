//! HTTP handlers.

pub mod chat;
pub mod health;
pub mod message;

use parley_types::chat::Chat;

use crate::http::error::AppError;
use crate::state::AppState;

/// Load a chat and verify the caller owns it.
///
/// Ownership enforcement for plain CRUD happens here at the boundary;
/// `send_message` re-checks inside the service because the exchange
/// sequence owns that responsibility.
pub(crate) async fn owned_chat(
    state: &AppState,
    chat_id: i64,
    caller_id: &str,
) -> Result<Chat, AppError> {
    let chat = state.chat_service.get_chat(chat_id).await?;
    if chat.owner_id != caller_id {
        return Err(AppError::forbidden("caller does not own this chat"));
    }
    Ok(chat)
}
