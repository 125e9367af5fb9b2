//! Axum router configuration with middleware.
//!
//! All API routes are under `/api/v1/`; `/health` is unauthenticated.
//! Middleware: CORS and request tracing.

use axum::Router;
use axum::routing::{delete, get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Chat CRUD + search
        .route("/chats", post(handlers::chat::create_chat))
        .route("/chats", get(handlers::chat::list_chats))
        .route("/chats/search", get(handlers::chat::search_chats))
        .route("/chats/{id}", get(handlers::chat::get_chat))
        .route("/chats/{id}", put(handlers::chat::update_chat))
        .route("/chats/{id}", delete(handlers::chat::delete_chat))
        // Message exchange + CRUD
        .route("/chats/{id}/messages", post(handlers::message::send_message))
        .route("/chats/{id}/messages", get(handlers::message::list_messages))
        .route("/messages/{id}", get(handlers::message::get_message))
        .route("/messages/{id}", put(handlers::message::update_message))
        .route("/messages/{id}", delete(handlers::message::delete_message))
        .with_state(state);

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
