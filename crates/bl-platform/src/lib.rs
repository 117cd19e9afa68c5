//! Bloglist Platform
//!
//! Blog bookmarks owned by registered users:
//! - Bearer token identity resolved per request
//! - Ownership-based authorization for mutations
//! - Statistics over the whole collection
//! - MongoDB or in-memory persistence

pub mod shared;
pub mod auth;
pub mod blog;
pub mod user;
pub mod stats;
pub mod app;

// Re-export commonly used types
pub use shared::error::{PlatformError, Result};
pub use shared::indexes::initialize_indexes;
pub use auth::{
    Argon2Config, Extraction, Identity, PasswordPolicy, PasswordService, Principal, TokenCodec,
    TokenCodecConfig, TokenError,
};
pub use blog::{Blog, BlogRepository, InMemoryBlogRepository, MongoBlogRepository};
pub use user::{InMemoryUserRepository, MongoUserRepository, User, UserRepository};
pub use app::{build_router, cors_layer, ApiDoc, PlatformServices};
