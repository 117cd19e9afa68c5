//! Statistics API

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::blog::api::BlogResponse;
use crate::blog::repository::BlogRepository;
use crate::shared::error::PlatformError;
use crate::stats::aggregation::{
    self, favorite_blog, most_liked_author, most_prolific_author, total_likes, AggregationError,
    AuthorBlogs, AuthorLikes,
};

/// Summary statistics. The optional fields are null when there are no blogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_likes: u64,
    pub favorite_blog: Option<BlogResponse>,
    pub most_blogs: Option<AuthorBlogs>,
    pub most_likes: Option<AuthorLikes>,
}

#[derive(Clone)]
pub struct StatsState {
    pub blog_repo: Arc<dyn BlogRepository>,
}

/// Compute statistics over every stored blog
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Blog statistics", body = StatsResponse),
        (status = 500, description = "Like totals out of range")
    )
)]
pub async fn get_stats(State(state): State<StatsState>) -> Result<Json<StatsResponse>, PlatformError> {
    let snapshot = state.blog_repo.find_all().await?;

    Ok(Json(StatsResponse {
        total_likes: total_likes(&snapshot).map_err(aggregation_failure)?,
        favorite_blog: present(favorite_blog(&snapshot))?.cloned().map(BlogResponse::from),
        most_blogs: present(most_prolific_author(&snapshot))?,
        most_likes: present(most_liked_author(&snapshot))?,
    }))
}

/// Empty input renders as null, any other aggregation failure fails the request.
fn present<T>(result: aggregation::Result<T>) -> Result<Option<T>, PlatformError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(AggregationError::EmptyInput) => Ok(None),
        Err(e) => Err(aggregation_failure(e)),
    }
}

fn aggregation_failure(err: AggregationError) -> PlatformError {
    PlatformError::internal(err.to_string())
}

/// Create stats router
pub fn stats_router(state: StatsState) -> Router {
    Router::new()
        .route("/", get(get_stats))
        .with_state(state)
}
