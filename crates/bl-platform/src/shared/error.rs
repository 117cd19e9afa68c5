//! Platform Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use utoipa::ToSchema;

use crate::auth::token_codec::TokenError;
use crate::shared::authorization_policy::DenyReason;

/// Message for a request that needs a caller but carried no bearer token
pub const TOKEN_MISSING: &str = "token missing";

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("expected `{field}` to be unique")]
    Duplicate { field: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("malformatted id")]
    MalformattedId { id: String },

    /// No principal on a request that requires one
    #[error("{message}")]
    Unauthenticated { message: String },

    #[error("user invalid")]
    OwnershipMismatch,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PlatformError {
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>) -> Self {
        Self::Duplicate { field: field.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PlatformError::NotFound { .. } => StatusCode::NOT_FOUND,
            PlatformError::Duplicate { .. }
            | PlatformError::Validation { .. }
            | PlatformError::MalformattedId { .. } => StatusCode::BAD_REQUEST,
            // Ownership mismatch deliberately shares 401 with the authentication failures
            PlatformError::Unauthenticated { .. }
            | PlatformError::OwnershipMismatch
            | PlatformError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            PlatformError::Database(_) | PlatformError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<TokenError> for PlatformError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => PlatformError::unauthenticated("token expired"),
            TokenError::Invalid { .. } => PlatformError::unauthenticated("token invalid"),
            TokenError::Signing { message } => PlatformError::Internal { message },
        }
    }
}

impl From<DenyReason> for PlatformError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::Unauthenticated => PlatformError::unauthenticated(TOKEN_MISSING),
            DenyReason::OwnershipMismatch => PlatformError::OwnershipMismatch,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Error response body
#[derive(Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for PlatformError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            PlatformError::NotFound { .. } => return status.into_response(),
            PlatformError::Database(e) => {
                tracing::error!(error = %e, "Database error");
            }
            PlatformError::Internal { message } => {
                tracing::error!(%message, "Internal error");
            }
            _ => {}
        }

        let message = match &self {
            PlatformError::Database(_) | PlatformError::Internal { .. } => {
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(PlatformError::not_found("Blog", "x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(PlatformError::validation("missing title or url").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(PlatformError::OwnershipMismatch.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(PlatformError::unauthenticated("token missing").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(PlatformError::internal("boom").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_messages_are_wire_compatible() {
        assert_eq!(PlatformError::validation("missing title or url").to_string(), "missing title or url");
        assert_eq!(PlatformError::duplicate("username").to_string(), "expected `username` to be unique");
        assert_eq!(PlatformError::MalformattedId { id: "zz".into() }.to_string(), "malformatted id");
    }

    #[test]
    fn test_token_errors_stay_distinguishable() {
        let expired = PlatformError::from(TokenError::Expired);
        assert_eq!(expired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(expired.to_string(), "token expired");

        let invalid = PlatformError::from(TokenError::Invalid { message: "bad".into() });
        assert_eq!(invalid.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(invalid.to_string(), "token invalid");

        let signing = PlatformError::from(TokenError::Signing { message: "key".into() });
        assert_eq!(signing.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_deny_reasons_map_to_401() {
        let err: PlatformError = DenyReason::OwnershipMismatch.into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        let err: PlatformError = DenyReason::Unauthenticated.into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
