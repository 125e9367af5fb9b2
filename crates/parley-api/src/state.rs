//! Application state wiring all services together.
//!
//! The services are generic over the store/client/sink traits; AppState
//! pins them to the concrete infra implementations.

use std::sync::Arc;

use parley_core::chat::service::ChatService;
use parley_core::event::bus::BroadcastEventSink;
use parley_core::llm::boxed::BoxInferenceClient;
use parley_core::message::service::MessageService;
use parley_infra::llm::{HttpInferenceClient, StaticInferenceClient};
use parley_infra::sqlite::chat::SqliteChatRepository;
use parley_infra::sqlite::message::SqliteMessageRepository;
use parley_infra::sqlite::pool::DatabasePool;
use parley_types::config::ServiceConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<SqliteChatRepository, BroadcastEventSink>;

pub type ConcreteMessageService = MessageService<
    SqliteMessageRepository,
    SqliteChatRepository,
    BoxInferenceClient,
    BroadcastEventSink,
>;

/// Shared application state holding the wired services and the event bus.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub message_service: Arc<ConcreteMessageService>,
    pub events: BroadcastEventSink,
}

impl AppState {
    /// Initialize the application state: connect to the database, select
    /// the inference client, wire the services.
    pub async fn init(config: &ServiceConfig, static_inference: bool) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&config.database.url()).await?;

        let events = BroadcastEventSink::new(config.events.channel_capacity);

        let client = if static_inference {
            BoxInferenceClient::new(StaticInferenceClient::default())
        } else {
            BoxInferenceClient::new(HttpInferenceClient::new(&config.inference))
        };

        let chat_service = ChatService::new(
            SqliteChatRepository::new(db_pool.clone()),
            events.clone(),
        );

        let message_service = MessageService::new(
            SqliteMessageRepository::new(db_pool.clone()),
            SqliteChatRepository::new(db_pool),
            client,
            events.clone(),
            config.inference.context_window,
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            message_service: Arc::new(message_service),
            events,
        })
    }
}
