//! Chat and message types for Parley.
//!
//! A chat is a titled conversation container owned by one user. Messages
//! are the turns within it, ordered by creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm::Turn;

// Re-export MessageRole from the llm module (it tags both stored messages
// and inference turns).
pub use crate::llm::MessageRole;

/// A conversation container owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub owner_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by the caller when creating a chat. The store assigns
/// the id and timestamps.
#[derive(Debug, Clone)]
pub struct NewChat {
    pub owner_id: String,
    pub title: String,
}

/// One turn in a chat.
///
/// `author_id` is present for user-authored turns and absent for turns
/// produced by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub chat_id: i64,
    pub author_id: Option<String>,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// View this message as an inference turn.
    pub fn as_turn(&self) -> Turn {
        Turn {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// Fields supplied when persisting a new message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub chat_id: i64,
    pub author_id: Option<String>,
    pub role: MessageRole,
    pub content: String,
}

impl NewMessage {
    /// A user-authored turn.
    pub fn user(chat_id: i64, author_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            chat_id,
            author_id: Some(author_id.into()),
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// A model-authored turn (no author).
    pub fn assistant(chat_id: i64, content: impl Into<String>) -> Self {
        Self {
            chat_id,
            author_id: None,
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}
