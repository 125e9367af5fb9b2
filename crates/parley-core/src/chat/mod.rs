//! Chat persistence abstraction and lifecycle service.
//!
//! This module defines the `ChatRepository` trait that the infrastructure
//! layer implements, and the `ChatService` that owns chat CRUD and its
//! lifecycle events.

pub mod repository;
pub mod service;
