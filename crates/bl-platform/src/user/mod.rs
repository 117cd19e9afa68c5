//! User Aggregate

pub mod entity;
pub mod repository;
pub mod operations;
pub mod api;

pub use entity::User;
pub use repository::{InMemoryUserRepository, MongoUserRepository, UserRepository};
pub use api::{users_router, UserResponse, UsersState};
