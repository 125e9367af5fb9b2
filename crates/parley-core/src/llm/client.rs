//! InferenceClient trait definition.
//!
//! One operation: send a bounded list of role-tagged turns, receive a
//! single assistant turn plus usage counters. Uses native async fn in
//! traits (RPITIT); implementations live in parley-infra.

use parley_types::error::InferenceError;
use parley_types::llm::{GenerateReply, GenerateRequest};

/// Client for the external model backend.
///
/// Implementations must bound the request with their configured timeout
/// and surface failures as typed errors, never hang. The caller does not
/// retry; retry policy, if any, belongs to the transport layer.
pub trait InferenceClient: Send + Sync {
    /// Human-readable backend name (e.g. "http", "static").
    fn name(&self) -> &str;

    /// Send the assembled context and return the reply turn.
    fn generate(
        &self,
        request: GenerateRequest,
    ) -> impl std::future::Future<Output = Result<GenerateReply, InferenceError>> + Send;
}
