//! Path id extractor.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::errors::AppError;

/// A `/:id` path segment parsed as a UUID.
///
/// A malformed id is a `VALIDATION_ERROR` in the usual JSON error body
/// rather than axum's plain-text rejection.
pub struct PathId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::validation("Invalid id format"))?;
        Ok(PathId(id))
    }
}
