//! Service logic and store trait definitions for Parley.
//!
//! This crate defines the "ports" (store, inference-client, and event-sink
//! traits) that the infrastructure layer implements, plus the services
//! that orchestrate them. It depends only on `parley-types` -- never on
//! `parley-infra` or any database/IO crate.

pub mod chat;
pub mod event;
pub mod llm;
pub mod message;

#[cfg(test)]
pub(crate) mod testing;
