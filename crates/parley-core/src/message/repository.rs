//! MessageRepository trait definition.
//!
//! Mirrors `ChatRepository`: CRUD plus ordered retrieval of a chat's
//! messages, and the `recent` window query used for context assembly.

use parley_types::chat::{Message, NewMessage};
use parley_types::error::StoreError;

/// Store for the messages belonging to chats.
pub trait MessageRepository: Send + Sync {
    /// Persist a new message, assigning its id and timestamps.
    fn create(
        &self,
        new: NewMessage,
    ) -> impl std::future::Future<Output = Result<Message, StoreError>> + Send;

    /// Get a message by id. Fails with `StoreError::NotFound` when absent.
    fn get(&self, id: i64)
    -> impl std::future::Future<Output = Result<Message, StoreError>> + Send;

    /// Page of a chat's messages, oldest first, plus the total count for
    /// that chat.
    fn get_by_chat(
        &self,
        chat_id: i64,
        limit: i64,
        offset: i64,
    ) -> impl std::future::Future<Output = Result<(Vec<Message>, i64), StoreError>> + Send;

    /// The last `limit` messages of a chat, returned oldest first.
    fn recent(
        &self,
        chat_id: i64,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, StoreError>> + Send;

    /// Replace the content and refresh `updated_at`. Fails with
    /// `StoreError::NotFound` when the id does not exist.
    fn update_content(
        &self,
        id: i64,
        content: &str,
    ) -> impl std::future::Future<Output = Result<Message, StoreError>> + Send;

    /// Delete a single message. Fails with `StoreError::NotFound` when absent.
    fn delete(&self, id: i64) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
