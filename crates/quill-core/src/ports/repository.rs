use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Comment, CommentPatch, CommentStatus, Post, PostFilter, PostPatch, PostStatus, User, UserRole,
};
use crate::error::RepoError;

/// Post store. `find_page` runs the filtered, sorted listing query and
/// returns the matching page together with the total match count.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    async fn find_page(&self, filter: &PostFilter) -> Result<(Vec<Post>, u64), RepoError>;

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Apply the set fields of `patch` and refresh `updated_at`, atomically.
    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Post, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    async fn count_all(&self) -> Result<u64, RepoError>;

    async fn count_by_status(&self, status: PostStatus) -> Result<u64, RepoError>;

    async fn total_views(&self) -> Result<i64, RepoError>;
}

/// Comment store. Deleting a comment removes its replies as well.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError>;

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    async fn update(&self, id: Uuid, patch: CommentPatch) -> Result<Comment, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    async fn count_all(&self) -> Result<u64, RepoError>;

    async fn count_by_status(&self, status: CommentStatus) -> Result<u64, RepoError>;
}

/// User store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> Result<User, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn mark_email_verified(&self, id: Uuid) -> Result<(), RepoError>;

    async fn count_all(&self) -> Result<u64, RepoError>;

    async fn count_by_role(&self, role: UserRole) -> Result<u64, RepoError>;
}
