//! Blog Statistics

pub mod aggregation;
pub mod api;

pub use aggregation::{AggregationError, AuthorBlogs, AuthorLikes};
pub use api::{stats_router, StatsResponse, StatsState};
