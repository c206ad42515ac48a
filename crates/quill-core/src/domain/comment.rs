use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EnumParseError;

/// Moderation status of a comment. New comments start APPROVED; the only
/// transitions are APPROVED <-> REJECT, driven by moderation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentStatus {
    #[default]
    #[serde(rename = "APPROVED")]
    Approved,
    #[serde(rename = "REJECT")]
    Reject,
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentStatus::Approved => write!(f, "APPROVED"),
            CommentStatus::Reject => write!(f, "REJECT"),
        }
    }
}

impl FromStr for CommentStatus {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APPROVED" => Ok(CommentStatus::Approved),
            "REJECT" => Ok(CommentStatus::Reject),
            other => Err(EnumParseError {
                kind: "comment status",
                value: other.to_string(),
            }),
        }
    }
}

/// Comment entity - a threaded comment on a post. `parent_id` links a reply
/// to another comment on the same post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub status: CommentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new APPROVED comment.
    pub fn new(content: String, author_id: Uuid, post_id: Uuid, parent_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            content,
            author_id,
            post_id,
            parent_id,
            status: CommentStatus::Approved,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a comment. `post_id` is optional at the wire level so
/// its absence surfaces as a validation failure from the service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewComment {
    pub content: String,
    pub post_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
}

/// Partial update as supplied by a caller. `status` arrives as a raw wire
/// string; only admins may set it through the update path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentUpdate {
    pub content: Option<String>,
    pub status: Option<String>,
}

/// Validated partial update applied by the repository.
#[derive(Debug, Clone, Default)]
pub struct CommentPatch {
    pub content: Option<String>,
    pub status: Option<CommentStatus>,
}
