use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    BlogStats, CommentStatus, NewPost, Post, PostFilter, PostPatch, PostStatus, PostUpdate,
    Principal, UserRole, can_mutate,
};
use crate::error::{DomainError, RepoError};
use crate::pagination::{Page, PageMeta};
use crate::ports::{CommentRepository, PostRepository, UserRepository};

const MAX_TITLE_LEN: usize = 255;

/// Post operations: listing, CRUD with ownership checks, and the admin
/// stats aggregate.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            comments,
            users,
        }
    }

    /// Create a DRAFT post owned by the caller.
    pub async fn create_post(
        &self,
        input: NewPost,
        author: &Principal,
    ) -> Result<Post, DomainError> {
        validate_title(&input.title)?;
        if input.content.trim().is_empty() {
            return Err(DomainError::validation("Content is required"));
        }
        if input.tags.is_empty() {
            return Err(DomainError::validation("At least one tag is required"));
        }

        let post = Post::new(input, author.id);
        tracing::debug!(post_id = %post.id, author_id = %author.id, "Creating post");
        Ok(self.posts.insert(post).await?)
    }

    /// Filtered, sorted, paginated listing wrapped in the pagination
    /// envelope. Tag filtering is ANY-match: a post qualifies when it
    /// carries at least one of the requested tags.
    pub async fn list_posts(&self, filter: PostFilter) -> Result<Page<Post>, DomainError> {
        let (data, total) = self.posts.find_page(&filter).await?;
        let pagination = PageMeta::new(total, filter.page.page, filter.page.limit);
        Ok(Page { data, pagination })
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    /// All posts by one author, unpaginated. Mirrors the "my posts" view;
    /// callers with large archives get the whole list.
    pub async fn my_posts(&self, author_id: Uuid) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.find_by_author(author_id).await?)
    }

    /// Partial update. Only the owning author or an admin may mutate;
    /// unset fields are left untouched.
    pub async fn update_post(
        &self,
        id: Uuid,
        update: PostUpdate,
        caller: &Principal,
    ) -> Result<Post, DomainError> {
        let existing = self.get_post(id).await?;
        if !can_mutate(caller, existing.author_id) {
            return Err(DomainError::Forbidden);
        }

        if let Some(title) = &update.title {
            validate_title(title)?;
        }
        let status = match &update.status {
            Some(raw) => Some(
                raw.parse::<PostStatus>()
                    .map_err(|e| DomainError::validation(e.to_string()))?,
            ),
            None => None,
        };

        let patch = PostPatch {
            title: update.title,
            content: update.content,
            thumbnail: update.thumbnail,
            is_featured: update.is_featured,
            tags: update.tags,
            status,
        };

        self.posts.update(id, patch).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Post", id),
            other => other.into(),
        })
    }

    /// Delete a post. Same ownership rule as update.
    pub async fn delete_post(&self, id: Uuid, caller: &Principal) -> Result<(), DomainError> {
        let existing = self.get_post(id).await?;
        if !can_mutate(caller, existing.author_id) {
            return Err(DomainError::Forbidden);
        }

        tracing::info!(post_id = %id, caller_id = %caller.id, "Deleting post");
        self.posts.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Post", id),
            other => other.into(),
        })
    }

    /// Aggregate counters across posts, comments and users. Admin-only.
    pub async fn stats(&self, caller: &Principal) -> Result<BlogStats, DomainError> {
        if !caller.is_admin() {
            return Err(DomainError::Forbidden);
        }

        Ok(BlogStats {
            total_posts: self.posts.count_all().await?,
            draft_posts: self.posts.count_by_status(PostStatus::Draft).await?,
            published_posts: self.posts.count_by_status(PostStatus::Published).await?,
            archived_posts: self.posts.count_by_status(PostStatus::Archived).await?,
            total_comments: self.comments.count_all().await?,
            approved_comments: self
                .comments
                .count_by_status(CommentStatus::Approved)
                .await?,
            rejected_comments: self.comments.count_by_status(CommentStatus::Reject).await?,
            total_users: self.users.count_all().await?,
            admin_count: self.users.count_by_role(UserRole::Admin).await?,
            user_count: self.users.count_by_role(UserRole::User).await?,
            total_views: self.posts.total_views().await?,
        })
    }
}

fn validate_title(title: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::validation("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use crate::pagination::{PageParams, RawPageParams};
    use crate::service::memory::{MemoryComments, MemoryPosts, MemoryUsers};

    fn service() -> (PostService, Arc<MemoryPosts>, Arc<MemoryComments>, Arc<MemoryUsers>) {
        let posts = Arc::new(MemoryPosts::default());
        let comments = Arc::new(MemoryComments::default());
        let users = Arc::new(MemoryUsers::default());
        let service = PostService::new(posts.clone(), comments.clone(), users.clone());
        (service, posts, comments, users)
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

    fn new_post(title: &str) -> NewPost {
        NewPost {
            title: title.into(),
            content: "Some content".into(),
            tags: vec!["rust".into()],
            thumbnail: None,
        }
    }

    fn pages(n: u64, limit: u64) -> PageParams {
        PageParams::normalize(RawPageParams {
            page: Some(n.to_string()),
            limit: Some(limit.to_string()),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn create_post_stamps_author_and_defaults() {
        let (service, ..) = service();
        let author = principal();

        let post = service
            .create_post(new_post("Hello"), &author)
            .await
            .unwrap();

        assert_eq!(post.author_id, Some(author.id));
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.views, 0);
        assert!(!post.is_featured);
    }

    #[tokio::test]
    async fn create_post_rejects_missing_fields() {
        let (service, ..) = service();
        let author = principal();

        let err = service
            .create_post(NewPost::default(), &author)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = service
            .create_post(
                NewPost {
                    tags: vec![],
                    ..new_post("Hello")
                },
                &author,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn list_posts_builds_pagination_envelope() {
        let (service, ..) = service();
        let author = principal();
        for i in 0..25 {
            service
                .create_post(new_post(&format!("Post {i}")), &author)
                .await
                .unwrap();
        }

        let page = service
            .list_posts(PostFilter {
                page: pages(3, 10),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.data.len(), 5);
        assert_eq!(page.pagination.total, 25);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.page, 3);
    }

    #[tokio::test]
    async fn tag_filter_matches_any_requested_tag() {
        let (service, ..) = service();
        let author = principal();
        for tags in [vec!["a"], vec!["b"], vec!["c"], vec!["a", "c"]] {
            service
                .create_post(
                    NewPost {
                        tags: tags.into_iter().map(String::from).collect(),
                        ..new_post("Tagged")
                    },
                    &author,
                )
                .await
                .unwrap();
        }

        let page = service
            .list_posts(PostFilter {
                tags: vec!["a".into(), "b".into()],
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.pagination.total, 3);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_over_title_and_content() {
        let (service, ..) = service();
        let author = principal();
        service
            .create_post(new_post("Rust Ownership"), &author)
            .await
            .unwrap();
        service
            .create_post(
                NewPost {
                    content: "all about OWNERSHIP".into(),
                    ..new_post("Other")
                },
                &author,
            )
            .await
            .unwrap();
        service
            .create_post(new_post("Unrelated"), &author)
            .await
            .unwrap();

        let page = service
            .list_posts(PostFilter {
                search: Some("ownership".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.pagination.total, 2);
    }

    #[tokio::test]
    async fn update_by_non_owner_is_forbidden_and_leaves_post_unmodified() {
        let (service, ..) = service();
        let author = principal();
        let post = service
            .create_post(new_post("Original"), &author)
            .await
            .unwrap();

        let err = service
            .update_post(
                post.id,
                PostUpdate {
                    title: Some("Hijacked".into()),
                    ..Default::default()
                },
                &principal(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Forbidden));
        assert_eq!(service.get_post(post.id).await.unwrap().title, "Original");
    }

    #[tokio::test]
    async fn update_applies_only_supplied_fields() {
        let (service, ..) = service();
        let author = principal();
        let post = service
            .create_post(new_post("Original"), &author)
            .await
            .unwrap();

        let updated = service
            .update_post(
                post.id,
                PostUpdate {
                    title: Some("Renamed".into()),
                    status: Some("PUBLISHED".into()),
                    ..Default::default()
                },
                &author,
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.status, PostStatus::Published);
        assert_eq!(updated.content, post.content);
        assert_eq!(updated.tags, post.tags);
    }

    #[tokio::test]
    async fn update_rejects_unknown_status() {
        let (service, ..) = service();
        let author = principal();
        let post = service
            .create_post(new_post("Original"), &author)
            .await
            .unwrap();

        let err = service
            .update_post(
                post.id,
                PostUpdate {
                    status: Some("LIVE".into()),
                    ..Default::default()
                },
                &author,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn admin_may_update_and_delete_any_post() {
        let (service, ..) = service();
        let post = service
            .create_post(new_post("Someone's"), &principal())
            .await
            .unwrap();

        service
            .update_post(
                post.id,
                PostUpdate {
                    is_featured: Some(true),
                    ..Default::default()
                },
                &admin(),
            )
            .await
            .unwrap();
        service.delete_post(post.id, &admin()).await.unwrap();

        let err = service.get_post(post.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_by_owner_succeeds_and_by_stranger_fails() {
        let (service, ..) = service();
        let author = principal();
        let post = service
            .create_post(new_post("Mine"), &author)
            .await
            .unwrap();

        let err = service
            .delete_post(post.id, &principal())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        service.delete_post(post.id, &author).await.unwrap();
    }

    #[tokio::test]
    async fn get_post_not_found() {
        let (service, ..) = service();
        let err = service.get_post(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn stats_requires_admin() {
        let (service, ..) = service();
        let err = service.stats(&principal()).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));
    }

    #[tokio::test]
    async fn stats_totals_match_per_bucket_sums() {
        let (service, _, comments, users) = service();
        let author = principal();

        for status in ["DRAFT", "PUBLISHED", "PUBLISHED", "ARCHIVED"] {
            let post = service.create_post(new_post("P"), &author).await.unwrap();
            service
                .update_post(
                    post.id,
                    PostUpdate {
                        status: Some(status.into()),
                        ..Default::default()
                    },
                    &author,
                )
                .await
                .unwrap();
            comments
                .insert(crate::domain::Comment::new(
                    "Nice".into(),
                    author.id,
                    post.id,
                    None,
                ))
                .await
                .unwrap();
        }
        users
            .insert(User::new(
                "Reader".into(),
                "reader@example.com".into(),
                "hash".into(),
                None,
            ))
            .await
            .unwrap();

        let stats = service.stats(&admin()).await.unwrap();

        assert_eq!(
            stats.total_posts,
            stats.draft_posts + stats.published_posts + stats.archived_posts
        );
        assert_eq!(
            stats.total_comments,
            stats.approved_comments + stats.rejected_comments
        );
        assert_eq!(stats.total_users, stats.admin_count + stats.user_count);
        assert_eq!(stats.total_posts, 4);
        assert_eq!(stats.published_posts, 2);
    }
}
