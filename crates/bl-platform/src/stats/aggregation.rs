//! Aggregation Engine
//!
//! Summary statistics over a snapshot of blogs. Every function is pure and reads the
//! slice left to right; ties always go to whatever was seen first.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::blog::entity::Blog;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationError {
    #[error("cannot aggregate an empty collection")]
    EmptyInput,

    #[error("like total does not fit in 64 bits")]
    Overflow,
}

pub type Result<T> = std::result::Result<T, AggregationError>;

/// Author with the most blogs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorBlogs {
    pub author: String,
    pub blogs: u64,
}

/// Author whose blogs collected the most likes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorLikes {
    pub author: String,
    pub likes: u64,
}

/// Always 1. Baseline for wiring checks.
pub fn constant_probe(_posts: &[Blog]) -> u64 {
    1
}

pub fn total_likes(posts: &[Blog]) -> Result<u64> {
    posts
        .iter()
        .try_fold(0u64, |total, post| total.checked_add(post.likes))
        .ok_or(AggregationError::Overflow)
}

/// Blog with the most likes. The earliest blog wins a tie.
pub fn favorite_blog(posts: &[Blog]) -> Result<&Blog> {
    let (first, rest) = posts.split_first().ok_or(AggregationError::EmptyInput)?;

    let mut leader = first;
    for post in rest {
        if post.likes > leader.likes {
            leader = post;
        }
    }
    Ok(leader)
}

pub fn most_prolific_author(posts: &[Blog]) -> Result<AuthorBlogs> {
    let (author, blogs) = leading_group(posts, |_| 1)?;
    Ok(AuthorBlogs { author, blogs })
}

pub fn most_liked_author(posts: &[Blog]) -> Result<AuthorLikes> {
    let (author, likes) = leading_group(posts, |post| post.likes)?;
    Ok(AuthorLikes { author, likes })
}

/// Group by author summing `weight`, then pick the largest total.
///
/// Groups keep the order in which their author first appeared, and the leader is only
/// replaced on a strictly larger total, so a tie goes to the group formed first.
fn leading_group<F>(posts: &[Blog], weight: F) -> Result<(String, u64)>
where
    F: Fn(&Blog) -> u64,
{
    let mut totals: IndexMap<&str, u64> = IndexMap::new();
    for post in posts {
        let total = totals.entry(post.author_key()).or_insert(0);
        *total = total.checked_add(weight(post)).ok_or(AggregationError::Overflow)?;
    }

    let mut groups = totals.into_iter();
    let mut leader = groups.next().ok_or(AggregationError::EmptyInput)?;
    for group in groups {
        if group.1 > leader.1 {
            leader = group;
        }
    }

    Ok((leader.0.to_string(), leader.1))
}
