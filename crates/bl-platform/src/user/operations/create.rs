//! Create User Use Case

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::password_service::PasswordService;
use crate::shared::error::{PlatformError, Result};
use crate::user::entity::User;
use crate::user::repository::UserRepository;

pub const MIN_USERNAME_LENGTH: usize = 3;

/// Command for registering a new user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserCommand {
    pub username: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing)]
    pub password: String,
}

/// Use case for registering a new user.
pub struct CreateUserUseCase {
    user_repo: Arc<dyn UserRepository>,
    password_service: Arc<PasswordService>,
}

impl CreateUserUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>, password_service: Arc<PasswordService>) -> Self {
        Self {
            user_repo,
            password_service,
        }
    }

    pub async fn execute(&self, command: CreateUserCommand) -> Result<User> {
        let username = command.username.trim();
        if username.chars().count() < MIN_USERNAME_LENGTH {
            return Err(PlatformError::validation(format!(
                "username must be at least {} characters long",
                MIN_USERNAME_LENGTH
            )));
        }

        // The store also enforces uniqueness on insert
        if self.user_repo.find_by_username(username).await?.is_some() {
            return Err(PlatformError::duplicate("username"));
        }

        let password_hash = self.password_service.hash_password(&command.password)?;

        let mut user = User::new(username, password_hash);
        if let Some(name) = command.name {
            user = user.with_name(name);
        }

        self.user_repo.insert(&user).await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password_service::{Argon2Config, PasswordPolicy};
    use crate::user::repository::InMemoryUserRepository;

    fn use_case(repo: Arc<InMemoryUserRepository>) -> CreateUserUseCase {
        let passwords = PasswordService::new(Argon2Config::testing(), PasswordPolicy::default()).unwrap();
        CreateUserUseCase::new(repo, Arc::new(passwords))
    }

    fn command(username: &str, password: &str) -> CreateUserCommand {
        CreateUserCommand {
            username: username.to_string(),
            name: Some("Superuser".to_string()),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let user = use_case(repo.clone()).execute(command("root", "salainen")).await.unwrap();

        assert_eq!(user.username, "root");
        assert_eq!(user.name.as_deref(), Some("Superuser"));
        assert!(user.blogs.is_empty());
        assert_ne!(user.password_hash, "salainen");
        assert!(repo.find_by_username("root").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let use_case = use_case(repo.clone());
        use_case.execute(command("root", "salainen")).await.unwrap();

        let err = use_case.execute(command("root", "other")).await.unwrap_err();
        assert_eq!(err.to_string(), "expected `username` to be unique");
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_short_username_and_password() {
        let use_case = use_case(Arc::new(InMemoryUserRepository::new()));

        let err = use_case.execute(command("ro", "salainen")).await.unwrap_err();
        assert_eq!(err.to_string(), "username must be at least 3 characters long");

        let err = use_case.execute(command("root", "pw")).await.unwrap_err();
        assert_eq!(err.to_string(), "password must be at least 3 characters long");
    }
}
