//! User Repository

use async_trait::async_trait;
use bson::oid::ObjectId;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection, Database};
use parking_lot::RwLock;

use crate::shared::error::{PlatformError, Result};
use crate::shared::indexes::is_duplicate_key_error;
use crate::user::entity::User;

pub const USERS_COLLECTION: &str = "users";

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `Duplicate` when the username is taken.
    async fn insert(&self, user: &User) -> Result<()>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>>;

    async fn find_all(&self) -> Result<Vec<User>>;

    /// Record `blog_id` as owned by the user
    async fn add_blog(&self, user_id: &ObjectId, blog_id: &ObjectId) -> Result<()>;

    async fn remove_blog(&self, user_id: &ObjectId, blog_id: &ObjectId) -> Result<()>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(USERS_COLLECTION),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: &User) -> Result<()> {
        match self.collection.insert_one(user).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key_error(&e) => Err(PlatformError::duplicate("username")),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.collection.find_one(doc! { "username": username }).await?)
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>> {
        let cursor = self.collection.find(doc! { "_id": { "$in": ids.to_vec() } }).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        let cursor = self.collection.find(doc! {}).sort(doc! { "_id": 1 }).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn add_blog(&self, user_id: &ObjectId, blog_id: &ObjectId) -> Result<()> {
        self.collection
            .update_one(doc! { "_id": user_id }, doc! { "$addToSet": { "blogs": blog_id } })
            .await?;
        Ok(())
    }

    async fn remove_blog(&self, user_id: &ObjectId, blog_id: &ObjectId) -> Result<()> {
        self.collection
            .update_one(doc! { "_id": user_id }, doc! { "$pull": { "blogs": blog_id } })
            .await?;
        Ok(())
    }
}

/// Process-local user store, kept in registration order
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<()> {
        let mut users = self.users.write();
        if users.iter().any(|u| u.username == user.username) {
            return Err(PlatformError::duplicate("username"));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>> {
        Ok(self.users.read().iter().find(|u| &u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.read().iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>> {
        Ok(self
            .users
            .read()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        Ok(self.users.read().clone())
    }

    async fn add_blog(&self, user_id: &ObjectId, blog_id: &ObjectId) -> Result<()> {
        if let Some(user) = self.users.write().iter_mut().find(|u| &u.id == user_id) {
            user.add_blog(*blog_id);
        }
        Ok(())
    }

    async fn remove_blog(&self, user_id: &ObjectId, blog_id: &ObjectId) -> Result<()> {
        if let Some(user) = self.users.write().iter_mut().find(|u| &u.id == user_id) {
            user.remove_blog(blog_id);
        }
        Ok(())
    }
}
