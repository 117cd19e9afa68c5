//! Create Blog Use Case

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::identity::Identity;
use crate::blog::entity::{Blog, MAX_LIKES};
use crate::blog::repository::BlogRepository;
use crate::shared::authorization_policy::{Action, AuthorizationPolicy};
use crate::shared::error::{PlatformError, Result, TOKEN_MISSING};
use crate::user::repository::UserRepository;

pub(crate) const MISSING_TITLE_OR_URL: &str = "missing title or url";

/// Reject like counts the store cannot represent
pub(crate) fn check_likes(likes: Option<u64>) -> Result<u64> {
    match likes {
        Some(likes) if likes > MAX_LIKES => Err(PlatformError::validation(format!(
            "likes must be at most {}",
            MAX_LIKES
        ))),
        likes => Ok(likes.unwrap_or(0)),
    }
}

/// Command for creating a new blog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBlogCommand {
    pub title: Option<String>,

    pub author: Option<String>,

    pub url: Option<String>,

    /// Defaults to 0
    pub likes: Option<u64>,
}

/// Use case for creating a blog owned by the caller.
pub struct CreateBlogUseCase {
    blog_repo: Arc<dyn BlogRepository>,
    user_repo: Arc<dyn UserRepository>,
    policy: AuthorizationPolicy,
}

impl CreateBlogUseCase {
    pub fn new(
        blog_repo: Arc<dyn BlogRepository>,
        user_repo: Arc<dyn UserRepository>,
        policy: AuthorizationPolicy,
    ) -> Self {
        Self {
            blog_repo,
            user_repo,
            policy,
        }
    }

    pub async fn execute(&self, command: CreateBlogCommand, identity: &Identity) -> Result<Blog> {
        self.policy.decide(Action::Create, None, identity).into_result()?;
        let principal = identity
            .principal()
            .ok_or_else(|| PlatformError::unauthenticated(TOKEN_MISSING))?;

        // Validation: title and url are required and non-empty
        let title = command.title.filter(|t| !t.is_empty());
        let url = command.url.filter(|u| !u.is_empty());
        let (Some(title), Some(url)) = (title, url) else {
            return Err(PlatformError::validation(MISSING_TITLE_OR_URL));
        };
        let likes = check_likes(command.likes)?;

        let owner = self
            .user_repo
            .find_by_id(&principal.user_id)
            .await?
            .ok_or_else(|| PlatformError::unauthenticated("user not found"))?;

        let blog = Blog::new(title, command.author, url, likes, owner.id);

        self.blog_repo.insert(&blog).await?;
        self.user_repo.add_blog(&owner.id, &blog.id).await?;

        info!(blog_id = %blog.id, user = %owner.username, "Blog created");
        Ok(blog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::repository::InMemoryBlogRepository;
    use crate::user::entity::User;
    use crate::user::repository::InMemoryUserRepository;

    struct Fixture {
        blogs: Arc<InMemoryBlogRepository>,
        users: Arc<InMemoryUserRepository>,
        use_case: CreateBlogUseCase,
        owner: User,
    }

    async fn fixture() -> Fixture {
        let blogs = Arc::new(InMemoryBlogRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let owner = User::new("root", "hash");
        users.insert(&owner).await.unwrap();

        let use_case = CreateBlogUseCase::new(blogs.clone(), users.clone(), AuthorizationPolicy::new());
        Fixture { blogs, users, use_case, owner }
    }

    fn command() -> CreateBlogCommand {
        CreateBlogCommand {
            title: Some("Go To Statement Considered Harmful".to_string()),
            author: Some("Edsger W. Dijkstra".to_string()),
            url: Some("http://example.com/goto".to_string()),
            likes: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_owner_and_default_likes() {
        let f = fixture().await;
        let blog = f.use_case.execute(command(), &f.owner.principal().into()).await.unwrap();

        assert_eq!(blog.likes, 0);
        assert_eq!(blog.user, f.owner.id);
        assert_eq!(f.blogs.find_all().await.unwrap(), vec![blog.clone()]);

        let owner = f.users.find_by_id(&f.owner.id).await.unwrap().unwrap();
        assert_eq!(owner.blogs, vec![blog.id]);
    }

    #[tokio::test]
    async fn test_create_requires_title_and_url() {
        let f = fixture().await;
        let identity: Identity = f.owner.principal().into();

        for command in [
            CreateBlogCommand { url: None, ..command() },
            CreateBlogCommand { title: None, ..command() },
            CreateBlogCommand { title: Some(String::new()), ..command() },
        ] {
            let err = f.use_case.execute(command, &identity).await.unwrap_err();
            assert_eq!(err.to_string(), MISSING_TITLE_OR_URL);
        }
        assert!(f.blogs.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_unstorable_likes() {
        let f = fixture().await;
        let identity: Identity = f.owner.principal().into();

        let err = f
            .use_case
            .execute(CreateBlogCommand { likes: Some(MAX_LIKES + 1), ..command() }, &identity)
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::Validation { .. }));
        assert!(f.blogs.find_all().await.unwrap().is_empty());

        let blog = f
            .use_case
            .execute(CreateBlogCommand { likes: Some(MAX_LIKES), ..command() }, &identity)
            .await
            .unwrap();
        assert_eq!(blog.likes, MAX_LIKES);
    }

    #[tokio::test]
    async fn test_create_rejects_anonymous() {
        let f = fixture().await;
        let err = f.use_case.execute(command(), &Identity::Anonymous).await.unwrap_err();
        assert!(matches!(err, PlatformError::Unauthenticated { .. }));
    }
}
