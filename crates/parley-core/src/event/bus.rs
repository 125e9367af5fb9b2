//! Broadcast-backed event sink distributing `EventEnvelope` to subscribers.
//!
//! Built on `tokio::sync::broadcast`: multiple concurrent subscribers,
//! multiple producers via `Clone`. Publishing with no active subscribers
//! succeeds and drops the event.

use tokio::sync::broadcast;

use parley_types::error::EventError;
use parley_types::event::EventEnvelope;

use super::sink::EventSink;

/// In-process event sink with broadcast fan-out.
///
/// Wraps a `tokio::sync::broadcast` channel. Cloning the sink clones the
/// sender, so producers and consumers can be spread across tasks.
pub struct BroadcastEventSink {
    sender: broadcast::Sender<EventEnvelope>,
}

impl BroadcastEventSink {
    /// Create a sink with the given channel capacity.
    ///
    /// Slow subscribers that fall more than `capacity` events behind see
    /// `Lagged` on their receiver; the sink itself never blocks.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a new subscriber that will receive all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }
}

impl EventSink for BroadcastEventSink {
    fn publish(&self, envelope: &EventEnvelope) -> Result<(), EventError> {
        // send only errors when there are no receivers; that is the
        // expected idle state, not a delivery failure.
        let _ = self.sender.send(envelope.clone());
        Ok(())
    }
}

impl Clone for BroadcastEventSink {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl std::fmt::Debug for BroadcastEventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastEventSink")
            .field("receiver_count", &self.sender.receiver_count())
            .finish()
    }
}
