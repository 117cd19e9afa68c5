//! Blog Operations
//!
//! Mutation use cases. Each one consults the authorization policy before touching
//! the repositories.

pub mod create;
pub mod update;
pub mod delete;

pub use create::{CreateBlogCommand, CreateBlogUseCase};
pub use update::{UpdateBlogCommand, UpdateBlogUseCase};
pub use delete::{DeleteBlogCommand, DeleteBlogUseCase};
