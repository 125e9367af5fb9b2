//! Caller identity extractor.
//!
//! Extracts the opaque user id from:
//! - `x-user-id: <id>` header
//! - `Authorization: Bearer <id>` header
//!
//! Token verification is the gateway's job; this service only needs the
//! identity for ownership checks and never interprets it beyond equality.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::http::error::AppError;

/// The authenticated caller's opaque user id.
pub struct CallerIdentity(pub String);

impl<S: Send + Sync> FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(value) = parts.headers.get("x-user-id") {
            let id = value
                .to_str()
                .map_err(|_| AppError::Unauthorized("Invalid x-user-id header".to_string()))?;
            if !id.is_empty() {
                return Ok(CallerIdentity(id.to_string()));
            }
        }

        if let Some(value) = parts.headers.get(axum::http::header::AUTHORIZATION) {
            let raw = value
                .to_str()
                .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;
            if let Some(id) = raw.strip_prefix("Bearer ") {
                if !id.is_empty() {
                    return Ok(CallerIdentity(id.to_string()));
                }
            }
        }

        Err(AppError::Unauthorized(
            "Caller identity required. Provide it via 'x-user-id: <id>' or 'Authorization: Bearer <id>' header.".to_string(),
        ))
    }
}
