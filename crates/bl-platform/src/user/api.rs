//! Users API
//!
//! Registration and listing.

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::blog::entity::Blog;
use crate::blog::repository::BlogRepository;
use crate::shared::error::PlatformError;
use crate::user::entity::User;
use crate::user::operations::{CreateUserCommand, CreateUserUseCase};
use crate::user::repository::UserRepository;

/// Create user request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: String,

    /// Display name
    pub name: Option<String>,

    #[serde(default)]
    pub password: String,
}

/// User response DTO. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    /// Owned blog IDs
    pub blogs: Vec<String>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id.to_hex(),
            username: u.username,
            name: u.name,
            blogs: u.blogs.iter().map(|id| id.to_hex()).collect(),
        }
    }
}

/// Blog summary embedded in user listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserBlog {
    pub url: String,
    pub title: String,
    pub author: Option<String>,
    pub id: String,
}

impl From<&Blog> for UserBlog {
    fn from(b: &Blog) -> Self {
        Self {
            url: b.url.clone(),
            title: b.title.clone(),
            author: b.author.clone(),
            id: b.id.to_hex(),
        }
    }
}

/// User listing entry with blogs populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserListItem {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub blogs: Vec<UserBlog>,
}

/// Users service state
#[derive(Clone)]
pub struct UsersState {
    pub user_repo: Arc<dyn UserRepository>,
    pub blog_repo: Arc<dyn BlogRepository>,
    pub create_use_case: Arc<CreateUserUseCase>,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error or duplicate username")
    )
)]
pub async fn create_user(
    State(state): State<UsersState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), PlatformError> {
    let command = CreateUserCommand {
        username: req.username,
        name: req.name,
        password: req.password,
    };

    let user = state.create_use_case.execute(command).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// List users with their blogs
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = Vec<UserListItem>)
    )
)]
pub async fn list_users(
    State(state): State<UsersState>,
) -> Result<Json<Vec<UserListItem>>, PlatformError> {
    let users = state.user_repo.find_all().await?;

    let blog_ids: Vec<_> = users.iter().flat_map(|u| u.blogs.iter().copied()).collect();
    let blogs: HashMap<_, _> = state
        .blog_repo
        .find_by_ids(&blog_ids)
        .await?
        .into_iter()
        .map(|b| (b.id, b))
        .collect();

    let items = users
        .into_iter()
        .map(|u| UserListItem {
            blogs: u.blogs.iter().filter_map(|id| blogs.get(id)).map(UserBlog::from).collect(),
            id: u.id.to_hex(),
            username: u.username,
            name: u.name,
        })
        .collect();

    Ok(Json(items))
}

/// Create users router
pub fn users_router(state: UsersState) -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .with_state(state)
}
