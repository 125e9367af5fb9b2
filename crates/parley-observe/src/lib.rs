//! Observability setup for Parley.
//!
//! Initializes the global tracing subscriber from the service's telemetry
//! configuration: structured logs (text or JSON) with an optional
//! OpenTelemetry bridge.

pub mod tracing_setup;
