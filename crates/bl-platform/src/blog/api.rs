//! Blogs API
//!
//! REST endpoints for blog listing and mutation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::blog::entity::Blog;
use crate::blog::operations::{
    CreateBlogCommand, CreateBlogUseCase,
    DeleteBlogCommand, DeleteBlogUseCase,
    UpdateBlogCommand, UpdateBlogUseCase,
};
use crate::blog::repository::BlogRepository;
use crate::shared::api_common::parse_object_id;
use crate::shared::error::PlatformError;
use crate::shared::middleware::RequireIdentity;
use crate::user::entity::User;
use crate::user::repository::UserRepository;

/// Create blog request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateBlogRequest {
    pub title: Option<String>,

    /// Free-text author name
    pub author: Option<String>,

    pub url: Option<String>,

    /// Defaults to 0
    pub likes: Option<u64>,
}

/// Update blog request. Omitted `likes` resets the count to 0.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<u64>,
}

/// Blog response DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BlogResponse {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub url: String,
    pub likes: u64,
    /// Owning user ID
    pub user: String,
}

impl From<Blog> for BlogResponse {
    fn from(b: Blog) -> Self {
        Self {
            id: b.id.to_hex(),
            title: b.title,
            author: b.author,
            url: b.url,
            likes: b.likes,
            user: b.user.to_hex(),
        }
    }
}

/// Owner summary embedded in blog listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BlogOwner {
    pub username: String,
    pub name: Option<String>,
    pub id: String,
}

impl From<&User> for BlogOwner {
    fn from(u: &User) -> Self {
        Self {
            username: u.username.clone(),
            name: u.name.clone(),
            id: u.id.to_hex(),
        }
    }
}

/// Blog listing entry with the owner populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BlogListItem {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub url: String,
    pub likes: u64,
    /// Null when the owning user no longer exists
    pub user: Option<BlogOwner>,
}

/// Blogs service state
#[derive(Clone)]
pub struct BlogsState {
    pub blog_repo: Arc<dyn BlogRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub create_use_case: Arc<CreateBlogUseCase>,
    pub update_use_case: Arc<UpdateBlogUseCase>,
    pub delete_use_case: Arc<DeleteBlogUseCase>,
}

/// List all blogs
#[utoipa::path(
    get,
    path = "/api/blogs",
    tag = "blogs",
    responses(
        (status = 200, description = "All blogs, oldest first", body = Vec<BlogListItem>)
    )
)]
pub async fn list_blogs(
    State(state): State<BlogsState>,
) -> Result<Json<Vec<BlogListItem>>, PlatformError> {
    let blogs = state.blog_repo.find_all().await?;

    let mut owner_ids: Vec<_> = blogs.iter().map(|b| b.user).collect();
    owner_ids.sort();
    owner_ids.dedup();

    let owners: HashMap<_, _> = state
        .user_repo
        .find_by_ids(&owner_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let items = blogs
        .into_iter()
        .map(|b| BlogListItem {
            user: owners.get(&b.user).map(BlogOwner::from),
            id: b.id.to_hex(),
            title: b.title,
            author: b.author,
            url: b.url,
            likes: b.likes,
        })
        .collect();

    Ok(Json(items))
}

/// Get blog by ID
#[utoipa::path(
    get,
    path = "/api/blogs/{id}",
    tag = "blogs",
    params(
        ("id" = String, Path, description = "Blog ID")
    ),
    responses(
        (status = 200, description = "Blog found", body = BlogResponse),
        (status = 400, description = "Malformatted ID"),
        (status = 404, description = "Blog not found, empty body")
    )
)]
pub async fn get_blog(
    State(state): State<BlogsState>,
    Path(id): Path<String>,
) -> Result<Json<BlogResponse>, PlatformError> {
    let blog_id = parse_object_id(&id)?;
    let blog = state.blog_repo.find_by_id(&blog_id).await?
        .ok_or_else(|| PlatformError::not_found("Blog", &id))?;

    Ok(Json(blog.into()))
}

/// Create a new blog owned by the caller
#[utoipa::path(
    post,
    path = "/api/blogs",
    tag = "blogs",
    request_body = CreateBlogRequest,
    responses(
        (status = 201, description = "Blog created", body = BlogResponse),
        (status = 400, description = "Missing title or url"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_blog(
    State(state): State<BlogsState>,
    caller: RequireIdentity,
    Json(req): Json<CreateBlogRequest>,
) -> Result<(StatusCode, Json<BlogResponse>), PlatformError> {
    let command = CreateBlogCommand {
        title: req.title,
        author: req.author,
        url: req.url,
        likes: req.likes,
    };

    let blog = state.create_use_case.execute(command, &caller.identity()).await?;
    Ok((StatusCode::CREATED, Json(blog.into())))
}

/// Update a blog
#[utoipa::path(
    put,
    path = "/api/blogs/{id}",
    tag = "blogs",
    params(
        ("id" = String, Path, description = "Blog ID")
    ),
    request_body = UpdateBlogRequest,
    responses(
        (status = 201, description = "Blog updated", body = BlogResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Blog not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_blog(
    State(state): State<BlogsState>,
    caller: RequireIdentity,
    Path(id): Path<String>,
    Json(req): Json<UpdateBlogRequest>,
) -> Result<(StatusCode, Json<BlogResponse>), PlatformError> {
    let command = UpdateBlogCommand {
        id: parse_object_id(&id)?,
        title: req.title,
        author: req.author,
        url: req.url,
        likes: req.likes,
    };

    let blog = state.update_use_case.execute(command, &caller.identity()).await?;
    Ok((StatusCode::CREATED, Json(blog.into())))
}

/// Delete a blog. Only its owner may do this.
#[utoipa::path(
    delete,
    path = "/api/blogs/{id}",
    tag = "blogs",
    params(
        ("id" = String, Path, description = "Blog ID")
    ),
    responses(
        (status = 204, description = "Blog deleted"),
        (status = 401, description = "Missing token or not the owner"),
        (status = 404, description = "Blog not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_blog(
    State(state): State<BlogsState>,
    caller: RequireIdentity,
    Path(id): Path<String>,
) -> Result<StatusCode, PlatformError> {
    let command = DeleteBlogCommand { id: parse_object_id(&id)? };

    state.delete_use_case.execute(command, &caller.identity()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create blogs router
pub fn blogs_router(state: BlogsState) -> Router {
    Router::new()
        .route("/", get(list_blogs).post(create_blog))
        .route("/:id", get(get_blog).put(update_blog).delete(delete_blog))
        .with_state(state)
}
