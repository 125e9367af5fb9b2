//! Inference backend clients.
//!
//! - `HttpInferenceClient`: talks to the model service over HTTP
//! - `StaticInferenceClient`: canned reply, no I/O; for local runs and tests

pub mod fixed;
pub mod http;

pub use fixed::StaticInferenceClient;
pub use http::HttpInferenceClient;
