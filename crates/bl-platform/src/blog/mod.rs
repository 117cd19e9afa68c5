//! Blog Aggregate
//!
//! Bookmarked blog posts and the use cases that mutate them.

pub mod entity;
pub mod repository;
pub mod operations;
pub mod api;

pub use entity::Blog;
pub use repository::{BlogRepository, InMemoryBlogRepository, MongoBlogRepository};
pub use api::{blogs_router, BlogResponse, BlogsState};
