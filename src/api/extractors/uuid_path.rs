//! UUID path parameter extractor.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::errors::AppError;

const UUID_EXPECTED: &str = "Validation failed (uuid is expected)";

/// A single `{id}` path segment that must parse as a UUID.
pub struct UuidParam(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for UuidParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request(UUID_EXPECTED))?;

        Uuid::parse_str(&raw)
            .map(UuidParam)
            .map_err(|_| AppError::bad_request(UUID_EXPECTED))
    }
}
