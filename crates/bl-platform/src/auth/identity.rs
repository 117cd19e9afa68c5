//! Request Identity
//!
//! Turns the raw `Authorization` header of a request into an [`Extraction`]. A missing or
//! bad token never fails the request at this stage. Endpoints that need a caller ask for
//! one later through `RequireIdentity`.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::auth::token_codec::{TokenCodec, TokenError};

/// Scheme prefix expected on the Authorization header
pub const BEARER_PREFIX: &str = "Bearer ";

/// Verified identity of the caller for the duration of one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: ObjectId,
    pub username: String,
}

impl Principal {
    pub fn new(user_id: ObjectId, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }
}

/// Who is making the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    Authenticated(Principal),
}

impl Identity {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(principal) => Some(principal),
        }
    }
}

impl From<Principal> for Identity {
    fn from(principal: Principal) -> Self {
        Identity::Authenticated(principal)
    }
}

/// Outcome of reading credentials off a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// No Authorization header, or not a bearer scheme
    NoToken,
    /// A bearer token was presented but did not verify
    Rejected(TokenError),
    Verified(Principal),
}

impl Extraction {
    pub fn identity(&self) -> Identity {
        match self {
            Extraction::Verified(principal) => Identity::Authenticated(principal.clone()),
            Extraction::NoToken | Extraction::Rejected(_) => Identity::Anonymous,
        }
    }
}

/// Extract bearer token from an Authorization header value
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix(BEARER_PREFIX)
}

/// Resolve the identity carried by an optional Authorization header.
pub fn extract_identity(codec: &TokenCodec, auth_header: Option<&str>) -> Extraction {
    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return Extraction::NoToken;
    };

    match codec.verify(token) {
        Ok(principal) => Extraction::Verified(principal),
        Err(e) => Extraction::Rejected(e),
    }
}
