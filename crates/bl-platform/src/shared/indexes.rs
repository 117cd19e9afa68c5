//! MongoDB Index Initialization
//!
//! Creates indexes on application startup.

use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Database, IndexModel,
};
use tracing::info;

use crate::blog::repository::BLOGS_COLLECTION;
use crate::user::repository::USERS_COLLECTION;

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Initialize all MongoDB indexes
pub async fn initialize_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    info!("Initializing MongoDB indexes...");

    create_user_indexes(db).await?;
    create_blog_indexes(db).await?;

    info!("MongoDB indexes initialized successfully");
    Ok(())
}

async fn create_user_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let users = db.collection::<mongodb::bson::Document>(USERS_COLLECTION);

    // Username uniqueness is enforced here, not in application code
    users.create_index(
        IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build(),
    ).await?;

    info!("Created indexes on {}", USERS_COLLECTION);
    Ok(())
}

async fn create_blog_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let blogs = db.collection::<mongodb::bson::Document>(BLOGS_COLLECTION);

    // Owner lookup
    blogs.create_index(
        IndexModel::builder()
            .keys(doc! { "user": 1 })
            .build(),
    ).await?;

    info!("Created indexes on {}", BLOGS_COLLECTION);
    Ok(())
}

/// True when a write failed on a unique index
pub fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY_CODE
    )
}
