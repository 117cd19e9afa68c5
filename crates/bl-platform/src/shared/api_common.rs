//! Common API types and utilities

use axum::{http::StatusCode, response::IntoResponse, Json};
use bson::oid::ObjectId;

use crate::shared::error::{ErrorResponse, PlatformError};

/// Parse a path id, rejecting anything that is not a 24 character hex ObjectId
pub fn parse_object_id(id: &str) -> Result<ObjectId, PlatformError> {
    ObjectId::parse_str(id).map_err(|_| PlatformError::MalformattedId { id: id.to_string() })
}

/// Fallback handler for routes that do not exist
pub async fn unknown_endpoint() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "unknown endpoint".to_string(),
        }),
    )
}
