//! Blog Entity

use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest like count a stored document can hold (BSON integers are signed 64-bit)
pub const MAX_LIKES: u64 = i64::MAX as u64;

/// A bookmarked blog post, owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub title: String,

    /// Free text, unrelated to the owning user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    pub url: String,

    #[serde(default)]
    pub likes: u64,

    /// Owning user, fixed at creation
    pub user: ObjectId,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    pub fn new(
        title: impl Into<String>,
        author: Option<String>,
        url: impl Into<String>,
        likes: u64,
        user: ObjectId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            title: title.into(),
            author,
            url: url.into(),
            likes,
            user,
            created_at: now,
            updated_at: now,
        }
    }

    /// Grouping key for author statistics. A missing author groups under the empty string.
    pub fn author_key(&self) -> &str {
        self.author.as_deref().unwrap_or("")
    }
}
