use axum::async_trait;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

/// The `:id` path segment, parsed as a MongoDB ObjectId.
///
/// A segment that is not 24 hex characters is rejected with 400 before any store call.
#[derive(Debug, Clone, Copy)]
pub struct CategoryId(pub ObjectId);

#[async_trait]
impl<S> FromRequestParts<S> for CategoryId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.body_text())))?;

        let id = ObjectId::parse_str(&raw).map_err(|_| {
            AppError::BadRequest(anyhow::anyhow!("Invalid category id \"{}\"", raw))
        })?;

        Ok(CategoryId(id))
    }
}
