//! Domain event envelopes for the Parley event sink.
//!
//! Events describe state transitions on chats and messages. They are
//! notification artifacts only: never persisted, no delivery guarantee.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::{Chat, Message, MessageRole};

/// Wrapper carrying an event id, its emission time, and the event itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: DomainEvent,
}

impl EventEnvelope {
    pub fn new(event: DomainEvent) -> Self {
        Self {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            event,
        }
    }

    /// The event kind tag, e.g. `chat.created`.
    pub fn kind(&self) -> &'static str {
        self.event.kind()
    }
}

/// State transitions published to the event sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum DomainEvent {
    #[serde(rename = "chat.created")]
    ChatCreated(ChatEventPayload),

    #[serde(rename = "chat.updated")]
    ChatUpdated(ChatEventPayload),

    #[serde(rename = "message.created")]
    MessageCreated(MessageEventPayload),

    #[serde(rename = "message.updated")]
    MessageUpdated(MessageEventPayload),
}

impl DomainEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            DomainEvent::ChatCreated(_) => "chat.created",
            DomainEvent::ChatUpdated(_) => "chat.updated",
            DomainEvent::MessageCreated(_) => "message.created",
            DomainEvent::MessageUpdated(_) => "message.updated",
        }
    }
}

/// Identifying fields of a mutated chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEventPayload {
    pub chat_id: i64,
    pub owner_id: String,
    pub title: String,
}

impl From<&Chat> for ChatEventPayload {
    fn from(chat: &Chat) -> Self {
        Self {
            chat_id: chat.id,
            owner_id: chat.owner_id.clone(),
            title: chat.title.clone(),
        }
    }
}

/// Identifying fields of a mutated message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEventPayload {
    pub message_id: i64,
    pub chat_id: i64,
    pub author_id: Option<String>,
    pub role: MessageRole,
    pub content: String,
}

impl From<&Message> for MessageEventPayload {
    fn from(message: &Message) -> Self {
        Self {
            message_id: message.id,
            chat_id: message.chat_id,
            author_id: message.author_id.clone(),
            role: message.role,
            content: message.content.clone(),
        }
    }
}
