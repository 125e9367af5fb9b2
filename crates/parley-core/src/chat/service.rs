//! Chat lifecycle service.
//!
//! `ChatService` owns chat CRUD and search above the `ChatRepository`,
//! publishing `chat.created` / `chat.updated` events best-effort.

use tracing::{debug, info, warn};

use parley_types::chat::{Chat, NewChat};
use parley_types::error::ChatError;
use parley_types::event::{DomainEvent, EventEnvelope};

use crate::chat::repository::ChatRepository;
use crate::event::sink::EventSink;

/// Page size substituted when the caller supplies a non-positive limit.
const DEFAULT_PAGE_SIZE: i64 = 10;

/// Orchestrates chat lifecycle: creation, lookup, search, rename, delete.
///
/// Generic over `ChatRepository` and `EventSink` so concrete backends are
/// injected at startup (parley-core never depends on parley-infra).
pub struct ChatService<C: ChatRepository, E: EventSink> {
    chats: C,
    events: E,
}

impl<C: ChatRepository, E: EventSink> ChatService<C, E> {
    pub fn new(chats: C, events: E) -> Self {
        Self { chats, events }
    }

    /// Create a chat for a user and announce it.
    ///
    /// Title non-emptiness is enforced at the API boundary, not here.
    pub async fn create_chat(&self, owner_id: &str, title: &str) -> Result<Chat, ChatError> {
        info!(owner_id, title, "creating chat");

        let chat = self
            .chats
            .create(NewChat {
                owner_id: owner_id.to_string(),
                title: title.to_string(),
            })
            .await?;

        self.emit(DomainEvent::ChatCreated((&chat).into()));
        Ok(chat)
    }

    pub async fn get_chat(&self, id: i64) -> Result<Chat, ChatError> {
        debug!(id, "getting chat");
        Ok(self.chats.get(id).await?)
    }

    /// Page of a user's chats, most recently updated first, plus total.
    pub async fn list_chats(
        &self,
        owner_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Chat>, i64), ChatError> {
        debug!(owner_id, limit, offset, "listing chats");
        let limit = if limit <= 0 { DEFAULT_PAGE_SIZE } else { limit };
        Ok(self.chats.get_by_owner(owner_id, limit, offset).await?)
    }

    /// Search a user's chats by title substring, plus total.
    pub async fn search_chats(
        &self,
        owner_id: &str,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Chat>, i64), ChatError> {
        debug!(owner_id, query, limit, offset, "searching chats");
        let limit = if limit <= 0 { DEFAULT_PAGE_SIZE } else { limit };
        Ok(self.chats.search(owner_id, query, limit, offset).await?)
    }

    /// Rename a chat and announce the update.
    pub async fn update_chat(&self, id: i64, title: &str) -> Result<Chat, ChatError> {
        info!(id, title, "updating chat");

        let chat = self.chats.update(id, title).await?;
        self.emit(DomainEvent::ChatUpdated((&chat).into()));
        Ok(chat)
    }

    /// Delete a chat together with its messages (the store cascades).
    pub async fn delete_chat(&self, id: i64) -> Result<(), ChatError> {
        info!(id, "deleting chat");
        Ok(self.chats.delete(id).await?)
    }

    /// Best-effort event publication: failures are logged, never surfaced.
    fn emit(&self, event: DomainEvent) {
        let envelope = EventEnvelope::new(event);
        if let Err(e) = self.events.publish(&envelope) {
            warn!(kind = envelope.kind(), error = %e, "failed to publish event");
        }
    }
}
