//! The send-message orchestrator and message CRUD.
//!
//! `MessageService::send_message` is the end-to-end exchange: verify
//! ownership, persist the user turn, assemble the context window, call
//! the inference backend, persist the reply, and announce both turns.
//!
//! Partial success is by design: once the user turn is persisted, a
//! later inference or storage failure does not roll it back. Callers
//! observing a failed send must re-fetch history rather than blindly
//! retry, which would duplicate the user turn.

use tracing::{debug, info, warn};

use parley_types::chat::{Message, MessageRole, NewMessage};
use parley_types::error::ChatError;
use parley_types::event::{DomainEvent, EventEnvelope};
use parley_types::llm::{GenerateRequest, Turn};

use crate::chat::repository::ChatRepository;
use crate::event::sink::EventSink;
use crate::llm::client::InferenceClient;
use crate::message::repository::MessageRepository;

/// Page size substituted when the caller supplies a non-positive limit.
const DEFAULT_PAGE_SIZE: i64 = 50;

/// Orchestrates message exchange and message CRUD.
///
/// Stateless and reentrant: concurrent sends share nothing in memory.
/// Sends to the same chat are not mutually excluded; interleaving follows
/// store write order.
pub struct MessageService<M, C, L, E>
where
    M: MessageRepository,
    C: ChatRepository,
    L: InferenceClient,
    E: EventSink,
{
    messages: M,
    chats: C,
    client: L,
    events: E,
    context_window: usize,
}

impl<M, C, L, E> MessageService<M, C, L, E>
where
    M: MessageRepository,
    C: ChatRepository,
    L: InferenceClient,
    E: EventSink,
{
    pub fn new(messages: M, chats: C, client: L, events: E, context_window: usize) -> Self {
        Self {
            messages,
            chats,
            client,
            events,
            context_window,
        }
    }

    /// Send a user message to a chat and obtain a model reply.
    ///
    /// Returns the persisted **user** turn; the assistant turn is read
    /// back via `list_messages`. Fails with `NotFound` for an unknown
    /// chat and `Forbidden` when the caller does not own it -- in both
    /// cases nothing is persisted.
    pub async fn send_message(
        &self,
        chat_id: i64,
        caller_id: &str,
        content: &str,
    ) -> Result<Message, ChatError> {
        info!(chat_id, caller_id, "processing new message");

        let chat = self.chats.get(chat_id).await?;
        if chat.owner_id != caller_id {
            return Err(ChatError::Forbidden(
                "caller does not own this chat".to_string(),
            ));
        }

        let user_message = self
            .messages
            .create(NewMessage::user(chat_id, caller_id, content))
            .await?;
        self.emit(DomainEvent::MessageCreated((&user_message).into()));

        let history = self
            .messages
            .recent(chat_id, self.context_window as i64)
            .await?;

        // The window fetch may or may not already see the turn persisted
        // above, depending on store consistency; drop it by id so it
        // appears exactly once, at the end.
        let mut turns: Vec<Turn> = history
            .iter()
            .filter(|m| m.id != user_message.id)
            .map(Message::as_turn)
            .collect();
        turns.push(user_message.as_turn());

        let reply = self
            .client
            .generate(GenerateRequest {
                messages: turns,
                model: None,
                max_tokens: None,
            })
            .await
            .map_err(|e| {
                // The user turn stays persisted; callers reconcile by
                // re-fetching history.
                warn!(chat_id, error = %e, "inference request failed");
                ChatError::Inference(e)
            })?;

        info!(
            chat_id,
            total_tokens = reply.usage.total_tokens,
            "inference completed"
        );

        let assistant_message = self
            .messages
            .create(NewMessage::assistant(chat_id, reply.message.content))
            .await?;
        self.emit(DomainEvent::MessageCreated((&assistant_message).into()));

        Ok(user_message)
    }

    pub async fn get_message(&self, id: i64) -> Result<Message, ChatError> {
        debug!(id, "getting message");
        Ok(self.messages.get(id).await?)
    }

    /// Page of a chat's messages in creation order, plus total.
    pub async fn list_messages(
        &self,
        chat_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Message>, i64), ChatError> {
        debug!(chat_id, limit, offset, "listing messages");
        let limit = if limit <= 0 { DEFAULT_PAGE_SIZE } else { limit };
        Ok(self.messages.get_by_chat(chat_id, limit, offset).await?)
    }

    /// Edit a user turn's content. Assistant turns cannot be edited.
    pub async fn update_message(&self, id: i64, content: &str) -> Result<Message, ChatError> {
        info!(id, "updating message");

        let message = self.messages.get(id).await?;
        if message.role != MessageRole::User {
            return Err(ChatError::Forbidden(
                "only user messages can be edited".to_string(),
            ));
        }

        let updated = self.messages.update_content(id, content).await?;
        self.emit(DomainEvent::MessageUpdated((&updated).into()));
        Ok(updated)
    }

    pub async fn delete_message(&self, id: i64) -> Result<(), ChatError> {
        info!(id, "deleting message");
        Ok(self.messages.delete(id).await?)
    }

    /// Best-effort event publication: failures are logged, never surfaced.
    fn emit(&self, event: DomainEvent) {
        let envelope = EventEnvelope::new(event);
        if let Err(e) = self.events.publish(&envelope) {
            warn!(kind = envelope.kind(), error = %e, "failed to publish event");
        }
    }
}
