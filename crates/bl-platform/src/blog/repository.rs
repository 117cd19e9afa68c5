//! Blog Repository

use async_trait::async_trait;
use bson::oid::ObjectId;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection, Database};
use parking_lot::RwLock;

use crate::blog::entity::Blog;
use crate::shared::error::Result;

pub const BLOGS_COLLECTION: &str = "blogs";

#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn insert(&self, blog: &Blog) -> Result<()>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Blog>>;

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Blog>>;

    /// Every blog, oldest first
    async fn find_all(&self) -> Result<Vec<Blog>>;

    /// Replace a stored blog. Returns false when no blog has that id.
    async fn update(&self, blog: &Blog) -> Result<bool>;

    /// Returns false when no blog has that id.
    async fn delete(&self, id: &ObjectId) -> Result<bool>;
}

pub struct MongoBlogRepository {
    collection: Collection<Blog>,
}

impl MongoBlogRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(BLOGS_COLLECTION),
        }
    }
}

#[async_trait]
impl BlogRepository for MongoBlogRepository {
    async fn insert(&self, blog: &Blog) -> Result<()> {
        self.collection.insert_one(blog).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Blog>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Blog>> {
        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .sort(doc! { "_id": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_all(&self) -> Result<Vec<Blog>> {
        let cursor = self.collection.find(doc! {}).sort(doc! { "_id": 1 }).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update(&self, blog: &Blog) -> Result<bool> {
        let result = self.collection.replace_one(doc! { "_id": &blog.id }, blog).await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}

/// Process-local blog store, kept in insertion order
#[derive(Default)]
pub struct InMemoryBlogRepository {
    blogs: RwLock<Vec<Blog>>,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn insert(&self, blog: &Blog) -> Result<()> {
        self.blogs.write().push(blog.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Blog>> {
        Ok(self.blogs.read().iter().find(|b| &b.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Blog>> {
        Ok(self
            .blogs
            .read()
            .iter()
            .filter(|b| ids.contains(&b.id))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Blog>> {
        Ok(self.blogs.read().clone())
    }

    async fn update(&self, blog: &Blog) -> Result<bool> {
        let mut blogs = self.blogs.write();
        match blogs.iter_mut().find(|b| b.id == blog.id) {
            Some(existing) => {
                *existing = blog.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool> {
        let mut blogs = self.blogs.write();
        let before = blogs.len();
        blogs.retain(|b| &b.id != id);
        Ok(blogs.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_preserves_insertion_order() {
        let repo = InMemoryBlogRepository::new();
        let owner = ObjectId::new();
        let first = Blog::new("first", None, "u1", 1, owner);
        let second = Blog::new("second", None, "u2", 2, owner);
        repo.insert(&first).await.unwrap();
        repo.insert(&second).await.unwrap();

        let titles: Vec<_> = repo.find_all().await.unwrap().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_in_memory_update_and_delete() {
        let repo = InMemoryBlogRepository::new();
        let mut blog = Blog::new("title", None, "url", 0, ObjectId::new());
        repo.insert(&blog).await.unwrap();

        blog.likes = 9;
        assert!(repo.update(&blog).await.unwrap());
        assert_eq!(repo.find_by_id(&blog.id).await.unwrap().unwrap().likes, 9);

        assert!(repo.delete(&blog.id).await.unwrap());
        assert!(!repo.delete(&blog.id).await.unwrap());
        assert!(!repo.update(&blog).await.unwrap());
    }
}
