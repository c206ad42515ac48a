use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    Comment, CommentPatch, CommentStatus, CommentUpdate, NewComment, Principal, can_mutate,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{CommentRepository, PostRepository};

/// Comment operations: threaded creation, ownership-checked edits, and
/// admin moderation.
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { comments, posts }
    }

    /// Create a comment, optionally as a reply. The target post must exist,
    /// and a reply must target a comment on the same post.
    pub async fn create_comment(
        &self,
        input: NewComment,
        caller: &Principal,
    ) -> Result<Comment, DomainError> {
        if input.content.trim().is_empty() {
            return Err(DomainError::validation("Content is required"));
        }
        let post_id = input
            .post_id
            .ok_or_else(|| DomainError::validation("postId is required"))?;

        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("Post", post_id));
        }

        if let Some(parent_id) = input.parent_id {
            let parent = self
                .comments
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| DomainError::validation("Parent comment does not exist"))?;
            if parent.post_id != post_id {
                return Err(DomainError::validation(
                    "Parent comment belongs to a different post",
                ));
            }
        }

        let comment = Comment::new(input.content, caller.id, post_id, input.parent_id);
        tracing::debug!(comment_id = %comment.id, post_id = %post_id, "Creating comment");
        Ok(self.comments.insert(comment).await?)
    }

    pub async fn get_comment(&self, id: Uuid) -> Result<Comment, DomainError> {
        self.comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Comment", id))
    }

    /// All comments by one author, regardless of status.
    pub async fn comments_by_author(&self, author_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        Ok(self.comments.find_by_author(author_id).await?)
    }

    /// Author-initiated edit. Owners may change content; a status change
    /// through this path is reserved for admins - moderation has its own
    /// operation.
    pub async fn update_comment(
        &self,
        id: Uuid,
        update: CommentUpdate,
        caller: &Principal,
    ) -> Result<Comment, DomainError> {
        let existing = self.get_comment(id).await?;
        if !can_mutate(caller, Some(existing.author_id)) {
            return Err(DomainError::Forbidden);
        }

        let status = match &update.status {
            Some(raw) => {
                if !caller.is_admin() {
                    return Err(DomainError::Forbidden);
                }
                Some(
                    raw.parse::<CommentStatus>()
                        .map_err(|e| DomainError::validation(e.to_string()))?,
                )
            }
            None => None,
        };

        let patch = CommentPatch {
            content: update.content,
            status,
        };
        self.comments.update(id, patch).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Comment", id),
            other => other.into(),
        })
    }

    /// Delete a comment and, through the store's cascade, its replies.
    pub async fn delete_comment(&self, id: Uuid, caller: &Principal) -> Result<(), DomainError> {
        let existing = self.get_comment(id).await?;
        if !can_mutate(caller, Some(existing.author_id)) {
            return Err(DomainError::Forbidden);
        }

        tracing::info!(comment_id = %id, caller_id = %caller.id, "Deleting comment");
        self.comments.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Comment", id),
            other => other.into(),
        })
    }

    /// Admin-only status transition: APPROVED <-> REJECT.
    pub async fn moderate_comment(
        &self,
        id: Uuid,
        status: Option<&str>,
        caller: &Principal,
    ) -> Result<Comment, DomainError> {
        if !caller.is_admin() {
            return Err(DomainError::Forbidden);
        }

        let status = status
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| DomainError::validation("status is required"))?
            .parse::<CommentStatus>()
            .map_err(|_| DomainError::validation("status must be APPROVED or REJECT"))?;

        let patch = CommentPatch {
            content: None,
            status: Some(status),
        };
        self.comments.update(id, patch).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Comment", id),
            other => other.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewPost, Post, UserRole};
    use crate::service::memory::{MemoryComments, MemoryPosts};

    struct Fixture {
        service: CommentService,
        posts: Arc<MemoryPosts>,
        post_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let posts = Arc::new(MemoryPosts::default());
        let comments = Arc::new(MemoryComments::default());
        let post = posts
            .insert(Post::new(
                NewPost {
                    title: "A post".into(),
                    content: "Body".into(),
                    tags: vec!["misc".into()],
                    thumbnail: None,
                },
                Uuid::new_v4(),
            ))
            .await
            .unwrap();
        Fixture {
            service: CommentService::new(comments, posts.clone()),
            posts,
            post_id: post.id,
        }
    }

    fn principal() -> Principal {
        Principal {
            id: Uuid::new_v4(),
            role: UserRole::User,
        }
    }

    fn admin() -> Principal {
        Principal {
            id: Uuid::new_v4(),
            role: UserRole::Admin,
        }
    }

    fn new_comment(post_id: Uuid) -> NewComment {
        NewComment {
            content: "First!".into(),
            post_id: Some(post_id),
            parent_id: None,
        }
    }

    #[tokio::test]
    async fn create_comment_defaults_to_approved() {
        let fx = fixture().await;
        let caller = principal();

        let comment = fx
            .service
            .create_comment(new_comment(fx.post_id), &caller)
            .await
            .unwrap();

        assert_eq!(comment.status, CommentStatus::Approved);
        assert_eq!(comment.author_id, caller.id);
        assert_eq!(comment.post_id, fx.post_id);
    }

    #[tokio::test]
    async fn create_comment_requires_content_and_post_id() {
        let fx = fixture().await;

        let err = fx
            .service
            .create_comment(
                NewComment {
                    content: "  ".into(),
                    post_id: Some(fx.post_id),
                    parent_id: None,
                },
                &principal(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = fx
            .service
            .create_comment(
                NewComment {
                    content: "Hi".into(),
                    post_id: None,
                    parent_id: None,
                },
                &principal(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn create_comment_on_missing_post_is_not_found() {
        let fx = fixture().await;

        let err = fx
            .service
            .create_comment(new_comment(Uuid::new_v4()), &principal())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn reply_must_target_comment_on_same_post() {
        let fx = fixture().await;
        let other_post = fx
            .posts
            .insert(Post::new(
                NewPost {
                    title: "Another".into(),
                    content: "Body".into(),
                    tags: vec!["misc".into()],
                    thumbnail: None,
                },
                Uuid::new_v4(),
            ))
            .await
            .unwrap();
        let parent = fx
            .service
            .create_comment(new_comment(other_post.id), &principal())
            .await
            .unwrap();

        let err = fx
            .service
            .create_comment(
                NewComment {
                    content: "Reply".into(),
                    post_id: Some(fx.post_id),
                    parent_id: Some(parent.id),
                },
                &principal(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn owner_may_edit_content_but_not_status() {
        let fx = fixture().await;
        let caller = principal();
        let comment = fx
            .service
            .create_comment(new_comment(fx.post_id), &caller)
            .await
            .unwrap();

        let updated = fx
            .service
            .update_comment(
                comment.id,
                CommentUpdate {
                    content: Some("Edited".into()),
                    status: None,
                },
                &caller,
            )
            .await
            .unwrap();
        assert_eq!(updated.content, "Edited");

        let err = fx
            .service
            .update_comment(
                comment.id,
                CommentUpdate {
                    content: None,
                    status: Some("REJECT".into()),
                },
                &caller,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));
    }

    #[tokio::test]
    async fn stranger_cannot_edit_or_delete() {
        let fx = fixture().await;
        let comment = fx
            .service
            .create_comment(new_comment(fx.post_id), &principal())
            .await
            .unwrap();

        let err = fx
            .service
            .update_comment(
                comment.id,
                CommentUpdate {
                    content: Some("Defaced".into()),
                    status: None,
                },
                &principal(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        let err = fx
            .service
            .delete_comment(comment.id, &principal())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));
    }

    #[tokio::test]
    async fn deleting_a_comment_removes_its_replies() {
        let fx = fixture().await;
        let caller = principal();
        let parent = fx
            .service
            .create_comment(new_comment(fx.post_id), &caller)
            .await
            .unwrap();
        let reply = fx
            .service
            .create_comment(
                NewComment {
                    content: "Reply".into(),
                    post_id: Some(fx.post_id),
                    parent_id: Some(parent.id),
                },
                &principal(),
            )
            .await
            .unwrap();

        fx.service.delete_comment(parent.id, &caller).await.unwrap();

        let err = fx.service.get_comment(reply.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn moderation_is_admin_only() {
        let fx = fixture().await;
        let comment = fx
            .service
            .create_comment(new_comment(fx.post_id), &principal())
            .await
            .unwrap();

        let err = fx
            .service
            .moderate_comment(comment.id, Some("REJECT"), &principal())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Forbidden));
    }

    #[tokio::test]
    async fn moderation_rejects_missing_or_unknown_status() {
        let fx = fixture().await;
        let comment = fx
            .service
            .create_comment(new_comment(fx.post_id), &principal())
            .await
            .unwrap();

        for bad in [None, Some(""), Some("PENDING"), Some("approved")] {
            let err = fx
                .service
                .moderate_comment(comment.id, bad, &admin())
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "for {bad:?}");
        }
    }

    #[tokio::test]
    async fn moderation_transitions_status_and_refreshes_updated_at() {
        let fx = fixture().await;
        let comment = fx
            .service
            .create_comment(new_comment(fx.post_id), &principal())
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let rejected = fx
            .service
            .moderate_comment(comment.id, Some("REJECT"), &admin())
            .await
            .unwrap();
        assert_eq!(rejected.status, CommentStatus::Reject);
        assert!(rejected.updated_at > comment.updated_at);

        let approved = fx
            .service
            .moderate_comment(comment.id, Some("APPROVED"), &admin())
            .await
            .unwrap();
        assert_eq!(approved.status, CommentStatus::Approved);
    }

    #[tokio::test]
    async fn moderating_missing_comment_is_not_found() {
        let fx = fixture().await;

        let err = fx
            .service
            .moderate_comment(Uuid::new_v4(), Some("REJECT"), &admin())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
