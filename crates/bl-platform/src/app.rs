//! Application Assembly
//!
//! Wires repositories and services into the HTTP router.

use axum::http::HeaderValue;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::login_api::{self, login_router, LoginRequest, LoginResponse, LoginState};
use crate::auth::password_service::PasswordService;
use crate::auth::token_codec::TokenCodec;
use crate::blog::api::{
    self as blog_api, blogs_router, BlogListItem, BlogOwner, BlogResponse, BlogsState,
    CreateBlogRequest, UpdateBlogRequest,
};
use crate::blog::operations::{CreateBlogUseCase, DeleteBlogUseCase, UpdateBlogUseCase};
use crate::blog::repository::{BlogRepository, InMemoryBlogRepository};
use crate::shared::api_common::unknown_endpoint;
use crate::shared::authorization_policy::AuthorizationPolicy;
use crate::shared::error::ErrorResponse;
use crate::shared::health_api::{self, health_router, HealthResponse, HealthStatus};
use crate::shared::middleware::IdentityLayer;
use crate::stats::aggregation::{AuthorBlogs, AuthorLikes};
use crate::stats::api::{self as stats_api, stats_router, StatsResponse, StatsState};
use crate::user::api::{
    self as user_api, users_router, CreateUserRequest, UserBlog, UserListItem, UserResponse,
    UsersState,
};
use crate::user::operations::CreateUserUseCase;
use crate::user::repository::{InMemoryUserRepository, UserRepository};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bloglist API",
        version = "0.1.0",
        description = "Blog bookmarks with per-user ownership, login and statistics"
    ),
    paths(
        blog_api::list_blogs,
        blog_api::get_blog,
        blog_api::create_blog,
        blog_api::update_blog,
        blog_api::delete_blog,
        user_api::create_user,
        user_api::list_users,
        login_api::login,
        stats_api::get_stats,
        health_api::health,
    ),
    components(schemas(
        BlogResponse,
        BlogListItem,
        BlogOwner,
        CreateBlogRequest,
        UpdateBlogRequest,
        UserResponse,
        UserListItem,
        UserBlog,
        CreateUserRequest,
        LoginRequest,
        LoginResponse,
        StatsResponse,
        AuthorBlogs,
        AuthorLikes,
        HealthResponse,
        HealthStatus,
        ErrorResponse,
    )),
    tags(
        (name = "blogs", description = "Blog bookmarks"),
        (name = "users", description = "User registration"),
        (name = "auth", description = "Login"),
        (name = "stats", description = "Blog statistics"),
        (name = "health", description = "Health check"),
    )
)]
pub struct ApiDoc;

/// Shared services behind the HTTP API
#[derive(Clone)]
pub struct PlatformServices {
    pub blog_repo: Arc<dyn BlogRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub token_codec: Arc<TokenCodec>,
    pub password_service: Arc<PasswordService>,
}

impl PlatformServices {
    pub fn new(
        blog_repo: Arc<dyn BlogRepository>,
        user_repo: Arc<dyn UserRepository>,
        token_codec: Arc<TokenCodec>,
        password_service: Arc<PasswordService>,
    ) -> Self {
        Self {
            blog_repo,
            user_repo,
            token_codec,
            password_service,
        }
    }

    /// Services backed by process-local storage
    pub fn in_memory(token_codec: TokenCodec, password_service: PasswordService) -> Self {
        Self::new(
            Arc::new(InMemoryBlogRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(token_codec),
            Arc::new(password_service),
        )
    }
}

/// Build a CORS layer. `*` allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(allowed))
}

/// Build the full API router
pub fn build_router(services: &PlatformServices, cors: CorsLayer) -> Router {
    let policy = AuthorizationPolicy::new();

    let blogs_state = BlogsState {
        blog_repo: services.blog_repo.clone(),
        user_repo: services.user_repo.clone(),
        create_use_case: Arc::new(CreateBlogUseCase::new(
            services.blog_repo.clone(),
            services.user_repo.clone(),
            policy,
        )),
        update_use_case: Arc::new(UpdateBlogUseCase::new(services.blog_repo.clone(), policy)),
        delete_use_case: Arc::new(DeleteBlogUseCase::new(
            services.blog_repo.clone(),
            services.user_repo.clone(),
            policy,
        )),
    };

    let users_state = UsersState {
        user_repo: services.user_repo.clone(),
        blog_repo: services.blog_repo.clone(),
        create_use_case: Arc::new(CreateUserUseCase::new(
            services.user_repo.clone(),
            services.password_service.clone(),
        )),
    };

    let login_state = LoginState {
        user_repo: services.user_repo.clone(),
        password_service: services.password_service.clone(),
        token_codec: services.token_codec.clone(),
    };

    let stats_state = StatsState {
        blog_repo: services.blog_repo.clone(),
    };

    Router::new()
        .nest("/api/blogs", blogs_router(blogs_state))
        .nest("/api/users", users_router(users_state))
        .nest("/api/login", login_router(login_state))
        .nest("/api/stats", stats_router(stats_state))
        .merge(health_router())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(unknown_endpoint)
        .layer(IdentityLayer::new(services.token_codec.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
