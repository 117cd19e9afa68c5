//! Authorization Policy
//!
//! Pure allow/deny decisions for blog mutations. Nothing here touches storage;
//! callers load the blog first and pass it in.
//!
//! | Action | Rule                                          |
//! |--------|-----------------------------------------------|
//! | create | any authenticated caller                      |
//! | update | any authenticated caller, owner not checked   |
//! | delete | caller's user id must equal the blog's owner  |

use crate::auth::identity::Identity;
use crate::blog::entity::Blog;
use crate::shared::error::PlatformError;

/// Mutation being attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    OwnershipMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn into_result(self) -> Result<(), PlatformError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(reason.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationPolicy;

impl AuthorizationPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Decide whether `identity` may perform `action` on `post`.
    ///
    /// `post` is `None` for creation. A delete with no post to compare against is denied
    /// as an ownership mismatch.
    pub fn decide(&self, action: Action, post: Option<&Blog>, identity: &Identity) -> Decision {
        let Some(principal) = identity.principal() else {
            return Decision::Deny(DenyReason::Unauthenticated);
        };

        match action {
            Action::Create | Action::Update => Decision::Allow,
            Action::Delete => match post {
                Some(post) if post.user == principal.user_id => Decision::Allow,
                _ => Decision::Deny(DenyReason::OwnershipMismatch),
            },
        }
    }
}
