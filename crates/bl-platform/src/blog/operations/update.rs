//! Update Blog Use Case

use std::sync::Arc;
use bson::oid::ObjectId;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::identity::Identity;
use crate::blog::entity::Blog;
use crate::blog::repository::BlogRepository;
use crate::shared::authorization_policy::{Action, AuthorizationPolicy};
use crate::shared::error::{PlatformError, Result};
use super::create::{check_likes, MISSING_TITLE_OR_URL};

/// Command for updating a blog.
///
/// Absent text fields keep their stored value. Absent `likes` resets the count to 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBlogCommand {
    pub id: ObjectId,

    pub title: Option<String>,

    pub author: Option<String>,

    pub url: Option<String>,

    pub likes: Option<u64>,
}

/// Use case for updating a blog. Any authenticated caller may update any blog.
pub struct UpdateBlogUseCase {
    blog_repo: Arc<dyn BlogRepository>,
    policy: AuthorizationPolicy,
}

impl UpdateBlogUseCase {
    pub fn new(blog_repo: Arc<dyn BlogRepository>, policy: AuthorizationPolicy) -> Self {
        Self { blog_repo, policy }
    }

    pub async fn execute(&self, command: UpdateBlogCommand, identity: &Identity) -> Result<Blog> {
        let mut blog = self
            .blog_repo
            .find_by_id(&command.id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Blog", command.id.to_hex()))?;

        self.policy.decide(Action::Update, Some(&blog), identity).into_result()?;

        if command.title.as_deref() == Some("") || command.url.as_deref() == Some("") {
            return Err(PlatformError::validation(MISSING_TITLE_OR_URL));
        }
        let likes = check_likes(command.likes)?;

        if let Some(title) = command.title {
            blog.title = title;
        }
        if let Some(url) = command.url {
            blog.url = url;
        }
        if let Some(author) = command.author {
            blog.author = Some(author);
        }
        blog.likes = likes;
        blog.updated_at = Utc::now();

        if !self.blog_repo.update(&blog).await? {
            return Err(PlatformError::not_found("Blog", blog.id.to_hex()));
        }

        info!(blog_id = %blog.id, likes = blog.likes, "Blog updated");
        Ok(blog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::Principal;
    use crate::blog::repository::InMemoryBlogRepository;

    async fn stored_blog(repo: &InMemoryBlogRepository, owner: ObjectId) -> Blog {
        let blog = Blog::new("Title", Some("Author".to_string()), "http://example.com", 5, owner);
        repo.insert(&blog).await.unwrap();
        blog
    }

    fn other_user() -> Identity {
        Principal::new(ObjectId::new(), "someone-else").into()
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_allowed() {
        let repo = Arc::new(InMemoryBlogRepository::new());
        let owner = ObjectId::new();
        let blog = stored_blog(&repo, owner).await;
        let use_case = UpdateBlogUseCase::new(repo.clone(), AuthorizationPolicy::new());

        let command = UpdateBlogCommand {
            id: blog.id,
            title: None,
            author: None,
            url: None,
            likes: Some(6),
        };
        let updated = use_case.execute(command, &other_user()).await.unwrap();

        assert_eq!(updated.likes, 6);
        assert_eq!(updated.title, "Title");
        assert_eq!(updated.user, owner);
        assert_eq!(repo.find_by_id(&blog.id).await.unwrap().unwrap(), updated);
    }

    #[tokio::test]
    async fn test_absent_likes_resets_to_zero() {
        let repo = Arc::new(InMemoryBlogRepository::new());
        let blog = stored_blog(&repo, ObjectId::new()).await;
        let use_case = UpdateBlogUseCase::new(repo, AuthorizationPolicy::new());

        let command = UpdateBlogCommand {
            id: blog.id,
            title: Some("New title".to_string()),
            author: None,
            url: None,
            likes: None,
        };
        let updated = use_case.execute(command, &other_user()).await.unwrap();

        assert_eq!(updated.likes, 0);
        assert_eq!(updated.title, "New title");
        assert_eq!(updated.author.as_deref(), Some("Author"));
    }

    #[tokio::test]
    async fn test_update_missing_blog_is_not_found() {
        let use_case = UpdateBlogUseCase::new(Arc::new(InMemoryBlogRepository::new()), AuthorizationPolicy::new());
        let command = UpdateBlogCommand {
            id: ObjectId::new(),
            title: None,
            author: None,
            url: None,
            likes: Some(1),
        };

        let err = use_case.execute(command, &other_user()).await.unwrap_err();
        assert!(matches!(err, PlatformError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_rejects_unstorable_likes() {
        let repo = Arc::new(InMemoryBlogRepository::new());
        let blog = stored_blog(&repo, ObjectId::new()).await;
        let use_case = UpdateBlogUseCase::new(repo.clone(), AuthorizationPolicy::new());
        let command = UpdateBlogCommand {
            id: blog.id,
            title: None,
            author: None,
            url: None,
            likes: Some(u64::MAX),
        };

        let err = use_case.execute(command, &other_user()).await.unwrap_err();
        assert!(matches!(err, PlatformError::Validation { .. }));
        assert_eq!(repo.find_by_id(&blog.id).await.unwrap().unwrap().likes, 5);
    }

    #[tokio::test]
    async fn test_update_rejects_anonymous() {
        let repo = Arc::new(InMemoryBlogRepository::new());
        let blog = stored_blog(&repo, ObjectId::new()).await;
        let use_case = UpdateBlogUseCase::new(repo, AuthorizationPolicy::new());
        let command = UpdateBlogCommand {
            id: blog.id,
            title: None,
            author: None,
            url: None,
            likes: Some(1),
        };

        let err = use_case.execute(command, &Identity::Anonymous).await.unwrap_err();
        assert!(matches!(err, PlatformError::Unauthenticated { .. }));
    }
}
