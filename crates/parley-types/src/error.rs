use thiserror::Error;

/// Errors from store operations (used by the trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from the inference backend.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference backend unavailable: {0}")]
    Unavailable(String),

    #[error("malformed inference response: {0}")]
    Malformed(String),

    #[error("invalid inference request: {0}")]
    InvalidRequest(String),
}

/// Errors from event publication. Always swallowed after logging.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("event channel closed")]
    Closed,

    #[error("publish error: {0}")]
    Publish(String),
}

/// Caller-facing errors from the chat and message services.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("not found")]
    NotFound,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ChatError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ChatError::NotFound,
            other => ChatError::Store(other),
        }
    }
}
