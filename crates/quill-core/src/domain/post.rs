use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EnumParseError;
use crate::pagination::PageParams;

/// Publication status of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostStatus {
    #[default]
    #[serde(rename = "DRAFT")]
    Draft,
    #[serde(rename = "PUBLISHED")]
    Published,
    #[serde(rename = "ARCHIVED")]
    Archived,
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostStatus::Draft => write!(f, "DRAFT"),
            PostStatus::Published => write!(f, "PUBLISHED"),
            PostStatus::Archived => write!(f, "ARCHIVED"),
        }
    }
}

impl FromStr for PostStatus {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(PostStatus::Draft),
            "PUBLISHED" => Ok(PostStatus::Published),
            "ARCHIVED" => Ok(PostStatus::Archived),
            other => Err(EnumParseError {
                kind: "post status",
                value: other.to_string(),
            }),
        }
    }
}

/// Post entity - represents a blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub thumbnail: Option<String>,
    pub is_featured: bool,
    pub status: PostStatus,
    pub tags: Vec<String>,
    pub views: i32,
    pub author_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new DRAFT post authored by `author_id`.
    pub fn new(input: NewPost, author_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            content: input.content,
            thumbnail: input.thumbnail,
            is_featured: false,
            status: PostStatus::Draft,
            tags: input.tags,
            views: 0,
            author_id: Some(author_id),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a post. Field presence is checked by the service so
/// that missing fields surface as validation failures rather than
/// deserialization errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub thumbnail: Option<String>,
}

/// Partial update as supplied by a caller. `status` arrives as a raw wire
/// string and is parsed by the service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub thumbnail: Option<String>,
    pub is_featured: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub status: Option<String>,
}

/// Validated partial update applied by the repository. Only set fields
/// change; `updated_at` is always refreshed.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub thumbnail: Option<String>,
    pub is_featured: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub status: Option<PostStatus>,
}

/// Filter for the post listing query.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub search: Option<String>,
    pub tags: Vec<String>,
    pub is_featured: Option<bool>,
    pub status: Option<PostStatus>,
    pub author_id: Option<Uuid>,
    pub page: PageParams,
}

/// Aggregate counters over the whole store. Admin-only read model.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogStats {
    pub total_posts: u64,
    pub draft_posts: u64,
    pub published_posts: u64,
    pub archived_posts: u64,
    pub total_comments: u64,
    pub approved_comments: u64,
    pub rejected_comments: u64,
    pub total_users: u64,
    pub admin_count: u64,
    pub user_count: u64,
    pub total_views: i64,
}
