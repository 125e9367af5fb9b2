//! EventSink trait definition.

use parley_types::error::EventError;
use parley_types::event::EventEnvelope;

/// Fire-and-forget publication of domain events.
///
/// Callers log and swallow the returned error: a user-visible operation
/// must never fail because its event could not be delivered. No ordering
/// or delivery guarantee is required of implementations.
pub trait EventSink: Send + Sync {
    fn publish(&self, envelope: &EventEnvelope) -> Result<(), EventError>;
}
