//! User Entity

use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::identity::Principal;

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    /// Unique login name
    pub username: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Argon2id PHC string
    pub password_hash: String,

    /// IDs of the blogs this user owns, no duplicates
    #[serde(default)]
    pub blogs: Vec<ObjectId>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            username: username.into(),
            name: None,
            password_hash: password_hash.into(),
            blogs: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn principal(&self) -> Principal {
        Principal::new(self.id, self.username.clone())
    }

    pub fn add_blog(&mut self, blog_id: ObjectId) {
        if !self.blogs.contains(&blog_id) {
            self.blogs.push(blog_id);
        }
    }

    pub fn remove_blog(&mut self, blog_id: &ObjectId) {
        self.blogs.retain(|id| id != blog_id);
    }

    pub fn owns(&self, blog_id: &ObjectId) -> bool {
        self.blogs.contains(blog_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_blogs_behave_as_a_set() {
        let mut user = User::new("root", "hash");
        let blog_id = ObjectId::new();

        user.add_blog(blog_id);
        user.add_blog(blog_id);
        assert_eq!(user.blogs.len(), 1);
        assert!(user.owns(&blog_id));

        user.remove_blog(&blog_id);
        assert!(!user.owns(&blog_id));
    }

    #[test]
    fn test_principal_uses_stable_id() {
        let user = User::new("root", "hash").with_name("Superuser");
        let principal = user.principal();
        assert_eq!(principal.user_id, user.id);
        assert_eq!(principal.username, "root");
    }

    #[test]
    fn test_bson_field_names() {
        let user = User::new("root", "hash");
        let doc = bson::to_document(&user).unwrap();
        assert!(doc.contains_key("_id"));
        assert!(doc.contains_key("passwordHash"));
        assert!(doc.contains_key("blogs"));
        assert!(!doc.contains_key("name"));
    }
}
