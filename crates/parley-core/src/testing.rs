//! In-memory test doubles shared by the service tests.
//!
//! The fakes clone-share their state through `Arc` so a test can keep a
//! handle for assertions after handing the double to a service.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use parley_types::chat::{Chat, Message, NewChat, NewMessage};
use parley_types::error::{EventError, InferenceError, StoreError};
use parley_types::event::EventEnvelope;
use parley_types::llm::{GenerateReply, GenerateRequest, MessageRole, TokenUsage, Turn};

use crate::chat::repository::ChatRepository;
use crate::event::sink::EventSink;
use crate::llm::client::InferenceClient;
use crate::message::repository::MessageRepository;

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub(crate) struct FakeChats {
    inner: Arc<Mutex<Vec<Chat>>>,
    next_id: Arc<AtomicI64>,
    /// (limit, offset) last passed to a paging query.
    pub(crate) last_page: Arc<Mutex<Option<(i64, i64)>>>,
}

impl FakeChats {
    /// Insert a chat directly, bypassing the repository trait.
    pub(crate) fn seed(&self, owner_id: &str, title: &str) -> Chat {
        let now = Utc::now();
        let chat = Chat {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            owner_id: owner_id.to_string(),
            title: title.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().push(chat.clone());
        chat
    }

    pub(crate) fn all(&self) -> Vec<Chat> {
        self.inner.lock().unwrap().clone()
    }
}

impl ChatRepository for FakeChats {
    async fn create(&self, new: NewChat) -> Result<Chat, StoreError> {
        Ok(self.seed(&new.owner_id, &new.title))
    }

    async fn get(&self, id: i64) -> Result<Chat, StoreError> {
        self.inner
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_owner(
        &self,
        owner_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Chat>, i64), StoreError> {
        *self.last_page.lock().unwrap() = Some((limit, offset));
        let mut chats: Vec<Chat> = self
            .inner
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect();
        chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        let total = chats.len() as i64;
        let page = chats
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn search(
        &self,
        owner_id: &str,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Chat>, i64), StoreError> {
        *self.last_page.lock().unwrap() = Some((limit, offset));
        let needle = query.to_lowercase();
        let mut chats: Vec<Chat> = self
            .inner
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.owner_id == owner_id && c.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        let total = chats.len() as i64;
        let page = chats
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn update(&self, id: i64, title: &str) -> Result<Chat, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let chat = inner
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound)?;
        chat.title = title.to_string();
        chat.updated_at = Utc::now();
        Ok(chat.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.len();
        inner.retain(|c| c.id != id);
        if inner.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeMessages {
    inner: Arc<Mutex<Vec<Message>>>,
    next_id: Arc<AtomicI64>,
    /// When set, `recent` does not see the most recently created message,
    /// imitating a store without read-your-writes on the window query.
    lag_recent: Arc<AtomicBool>,
    pub(crate) last_page: Arc<Mutex<Option<(i64, i64)>>>,
}

impl FakeMessages {
    pub(crate) fn seed(&self, chat_id: i64, role: MessageRole, content: &str) -> Message {
        let now = Utc::now();
        let author_id = match role {
            MessageRole::User => Some("u1".to_string()),
            MessageRole::Assistant => None,
        };
        let message = Message {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            chat_id,
            author_id,
            role,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().push(message.clone());
        message
    }

    pub(crate) fn set_lagging(&self, lagging: bool) {
        self.lag_recent.store(lagging, Ordering::SeqCst);
    }

    pub(crate) fn all(&self, chat_id: i64) -> Vec<Message> {
        let mut messages: Vec<Message> = self
            .inner
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.id);
        messages
    }
}

impl MessageRepository for FakeMessages {
    async fn create(&self, new: NewMessage) -> Result<Message, StoreError> {
        let now = Utc::now();
        let message = Message {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            chat_id: new.chat_id,
            author_id: new.author_id,
            role: new.role,
            content: new.content,
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().push(message.clone());
        Ok(message)
    }

    async fn get(&self, id: i64) -> Result<Message, StoreError> {
        self.inner
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_chat(
        &self,
        chat_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Message>, i64), StoreError> {
        *self.last_page.lock().unwrap() = Some((limit, offset));
        let messages = self.all(chat_id);
        let total = messages.len() as i64;
        let page = messages
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn recent(&self, chat_id: i64, limit: i64) -> Result<Vec<Message>, StoreError> {
        let mut messages = self.all(chat_id);
        if self.lag_recent.load(Ordering::SeqCst) {
            messages.pop();
        }
        let skip = messages.len().saturating_sub(limit.max(0) as usize);
        Ok(messages.into_iter().skip(skip).collect())
    }

    async fn update_content(&self, id: i64, content: &str) -> Result<Message, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let message = inner
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::NotFound)?;
        message.content = content.to_string();
        message.updated_at = Utc::now();
        Ok(message.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.len();
        inner.retain(|m| m.id != id);
        if inner.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Inference clients
// ---------------------------------------------------------------------------

/// Records every request and answers with a fixed reply (or a failure).
#[derive(Clone)]
pub(crate) struct ScriptedClient {
    reply: String,
    fail: bool,
    pub(crate) requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl ScriptedClient {
    pub(crate) fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            fail: false,
            requests: Arc::default(),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            reply: String::new(),
            fail: true,
            requests: Arc::default(),
        }
    }
}

impl InferenceClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateReply, InferenceError> {
        self.requests.lock().unwrap().push(request);
        if self.fail {
            return Err(InferenceError::Unavailable("backend down".to_string()));
        }
        Ok(GenerateReply {
            message: Turn::new(MessageRole::Assistant, self.reply.clone()),
            usage: TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            },
            model: "scripted".to_string(),
        })
    }
}

/// Never resolves; used to park a send mid-flight for cancellation tests.
pub(crate) struct HangingClient;

impl InferenceClient for HangingClient {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateReply, InferenceError> {
        std::future::pending::<()>().await;
        unreachable!()
    }
}

// ---------------------------------------------------------------------------
// Event sinks
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub(crate) struct RecordingSink {
    pub(crate) published: Arc<Mutex<Vec<EventEnvelope>>>,
}

impl RecordingSink {
    pub(crate) fn kinds(&self) -> Vec<&'static str> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.kind())
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, envelope: &EventEnvelope) -> Result<(), EventError> {
        self.published.lock().unwrap().push(envelope.clone());
        Ok(())
    }
}

/// Always fails; the services must log and carry on.
#[derive(Clone, Default)]
pub(crate) struct FailingSink;

impl EventSink for FailingSink {
    fn publish(&self, _envelope: &EventEnvelope) -> Result<(), EventError> {
        Err(EventError::Publish("sink offline".to_string()))
    }
}
