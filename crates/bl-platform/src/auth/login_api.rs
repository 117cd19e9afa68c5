//! Login API
//!
//! Exchanges a username and password for a bearer token.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::auth::password_service::PasswordService;
use crate::auth::token_codec::TokenCodec;
use crate::shared::error::PlatformError;
use crate::user::repository::UserRepository;

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for the Authorization header
    pub token: String,
    pub username: String,
    pub name: Option<String>,
}

/// Login service state
#[derive(Clone)]
pub struct LoginState {
    pub user_repo: Arc<dyn UserRepository>,
    pub password_service: Arc<PasswordService>,
    pub token_codec: Arc<TokenCodec>,
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn login(
    State(state): State<LoginState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, PlatformError> {
    let Some(user) = state.user_repo.find_by_username(&req.username).await? else {
        warn!(username = %req.username, "Login failed: unknown user");
        return Err(PlatformError::InvalidCredentials);
    };

    if !state.password_service.verify_password(&req.password, &user.password_hash)? {
        warn!(username = %req.username, "Login failed: wrong password");
        return Err(PlatformError::InvalidCredentials);
    }

    let token = state.token_codec.sign(&user.principal())?;

    info!(user_id = %user.id, "User logged in");
    Ok(Json(LoginResponse {
        token,
        username: user.username,
        name: user.name,
    }))
}

/// Create login router
pub fn login_router(state: LoginState) -> Router {
    Router::new()
        .route("/", post(login))
        .with_state(state)
}
