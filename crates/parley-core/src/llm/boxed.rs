//! BoxInferenceClient -- object-safe dynamic dispatch wrapper for InferenceClient.
//!
//! 1. Define an object-safe `InferenceClientDyn` trait with boxed futures
//! 2. Blanket-impl `InferenceClientDyn` for all `T: InferenceClient`
//! 3. `BoxInferenceClient` wraps `Box<dyn InferenceClientDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use parley_types::error::InferenceError;
use parley_types::llm::{GenerateReply, GenerateRequest};

use super::client::InferenceClient;

/// Object-safe version of [`InferenceClient`] with boxed futures.
///
/// Exists solely to enable dynamic dispatch; a blanket implementation is
/// provided for all types implementing `InferenceClient`.
pub trait InferenceClientDyn: Send + Sync {
    fn name(&self) -> &str;

    fn generate_boxed(
        &self,
        request: GenerateRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GenerateReply, InferenceError>> + Send + '_>>;
}

/// Blanket implementation: any `InferenceClient` automatically implements
/// `InferenceClientDyn`.
impl<T: InferenceClient> InferenceClientDyn for T {
    fn name(&self) -> &str {
        InferenceClient::name(self)
    }

    fn generate_boxed(
        &self,
        request: GenerateRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GenerateReply, InferenceError>> + Send + '_>> {
        Box::pin(self.generate(request))
    }
}

/// Type-erased inference client for runtime backend selection.
///
/// `InferenceClient` uses RPITIT and cannot be a trait object directly;
/// `BoxInferenceClient` wraps any implementation behind dynamic dispatch
/// and itself implements `InferenceClient`, so services stay generic.
pub struct BoxInferenceClient {
    inner: Box<dyn InferenceClientDyn + Send + Sync>,
}

impl BoxInferenceClient {
    /// Wrap a concrete `InferenceClient` in a type-erased box.
    pub fn new<T: InferenceClient + 'static>(client: T) -> Self {
        Self {
            inner: Box::new(client),
        }
    }
}

impl InferenceClient for BoxInferenceClient {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateReply, InferenceError> {
        self.inner.generate_boxed(request).await
    }
}
