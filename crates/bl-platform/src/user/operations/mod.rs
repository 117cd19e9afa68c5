//! User Operations

pub mod create;

pub use create::{CreateUserCommand, CreateUserUseCase, MIN_USERNAME_LENGTH};
