//! Shared Module
//!
//! Cross-cutting concerns and shared utilities.

pub mod error;
pub mod middleware;
pub mod api_common;
pub mod indexes;
pub mod health_api;
pub mod authorization_policy;

// Re-export commonly used items
pub use error::{PlatformError, Result};
pub use middleware::{CurrentIdentity, IdentityLayer, RequireIdentity};
pub use authorization_policy::{Action, AuthorizationPolicy, Decision, DenyReason};
pub use health_api::health_router;
