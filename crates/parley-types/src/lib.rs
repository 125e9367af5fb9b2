//! Shared domain types for Parley.
//!
//! This crate contains the types used across the Parley service: chats,
//! messages, inference request/reply shapes, event envelopes, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod event;
pub mod llm;
