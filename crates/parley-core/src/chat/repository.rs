//! ChatRepository trait definition.
//!
//! CRUD and owner-scoped search over chat records. Uses native async fn
//! in traits (RPITIT); implementations live in parley-infra.

use parley_types::chat::{Chat, NewChat};
use parley_types::error::StoreError;

/// Store for chat records.
///
/// Operations are scoped only by the ids the caller supplies -- the store
/// performs no authorization itself.
pub trait ChatRepository: Send + Sync {
    /// Persist a new chat, assigning its id and timestamps.
    fn create(
        &self,
        new: NewChat,
    ) -> impl std::future::Future<Output = Result<Chat, StoreError>> + Send;

    /// Get a chat by id. Fails with `StoreError::NotFound` when absent.
    fn get(&self, id: i64) -> impl std::future::Future<Output = Result<Chat, StoreError>> + Send;

    /// Page of an owner's chats, most-recently-updated first, plus the
    /// total count for that owner.
    fn get_by_owner(
        &self,
        owner_id: &str,
        limit: i64,
        offset: i64,
    ) -> impl std::future::Future<Output = Result<(Vec<Chat>, i64), StoreError>> + Send;

    /// Case-insensitive substring search on title, scoped to an owner,
    /// same ordering and total as `get_by_owner`.
    fn search(
        &self,
        owner_id: &str,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> impl std::future::Future<Output = Result<(Vec<Chat>, i64), StoreError>> + Send;

    /// Replace the title and refresh `updated_at`. Fails with
    /// `StoreError::NotFound` when the id does not exist.
    fn update(
        &self,
        id: i64,
        title: &str,
    ) -> impl std::future::Future<Output = Result<Chat, StoreError>> + Send;

    /// Delete a chat and, atomically, all of its messages.
    fn delete(&self, id: i64) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
