//! Best-effort domain event publication.
//!
//! `EventSink` is the seam the services publish through; delivery failure
//! is logged by the caller and never propagated. `BroadcastEventSink` is
//! the in-process implementation on `tokio::sync::broadcast`.

pub mod bus;
pub mod sink;

pub use bus::BroadcastEventSink;
pub use sink::EventSink;
