//! Delete Blog Use Case

use std::sync::Arc;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::identity::Identity;
use crate::blog::repository::BlogRepository;
use crate::shared::authorization_policy::{Action, AuthorizationPolicy, Decision};
use crate::shared::error::{PlatformError, Result};
use crate::user::repository::UserRepository;

/// Command for deleting a blog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBlogCommand {
    pub id: ObjectId,
}

/// Use case for deleting a blog. Only the owner may delete.
pub struct DeleteBlogUseCase {
    blog_repo: Arc<dyn BlogRepository>,
    user_repo: Arc<dyn UserRepository>,
    policy: AuthorizationPolicy,
}

impl DeleteBlogUseCase {
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

    pub async fn execute(&self, command: DeleteBlogCommand, identity: &Identity) -> Result<()> {
        let blog = self
            .blog_repo
            .find_by_id(&command.id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Blog", command.id.to_hex()))?;

        let decision = self.policy.decide(Action::Delete, Some(&blog), identity);
        if let Decision::Deny(reason) = decision {
            warn!(blog_id = %blog.id, ?reason, "Blog deletion denied");
        }
        decision.into_result()?;

        self.blog_repo.delete(&blog.id).await?;
        self.user_repo.remove_blog(&blog.user, &blog.id).await?;

        info!(blog_id = %blog.id, "Blog deleted");
        Ok(())
    }
}
