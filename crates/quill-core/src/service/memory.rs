//! In-memory repository implementations backing the service tests. They
//! mirror the documented store semantics: ANY-match tag filtering,
//! case-insensitive substring search, and cascade deletion of replies.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    Comment, CommentPatch, CommentStatus, Post, PostFilter, PostPatch, PostStatus, User, UserRole,
};
use crate::error::RepoError;
use crate::pagination::SortOrder;
use crate::ports::{CommentRepository, PostRepository, UserRepository};

#[derive(Default)]
pub struct MemoryPosts {
    rows: Mutex<Vec<Post>>,
}

fn matches(filter: &PostFilter, post: &Post) -> bool {
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        if !post.title.to_lowercase().contains(&needle)
            && !post.content.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    if !filter.tags.is_empty() && !post.tags.iter().any(|t| filter.tags.contains(t)) {
        return false;
    }
    if let Some(is_featured) = filter.is_featured {
        if post.is_featured != is_featured {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if post.status != status {
            return false;
        }
    }
    if let Some(author_id) = filter.author_id {
        if post.author_id != Some(author_id) {
            return false;
        }
    }
    true
}

#[async_trait]
impl PostRepository for MemoryPosts {
    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        self.rows.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_page(&self, filter: &PostFilter) -> Result<(Vec<Post>, u64), RepoError> {
        let rows = self.rows.lock().unwrap();
        let mut hits: Vec<Post> = rows.iter().filter(|p| matches(filter, p)).cloned().collect();
        // The fixture only sorts by creation time; that is all the tests need.
        hits.sort_by_key(|p| (p.created_at, p.id));
        if filter.page.sort_order == SortOrder::Desc {
            hits.reverse();
        }

        let total = hits.len() as u64;
        let page = hits
            .into_iter()
            .skip(filter.page.skip as usize)
            .take(filter.page.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.author_id == Some(author_id))
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Post, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let post = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(thumbnail) = patch.thumbnail {
            post.thumbnail = Some(thumbnail);
        }
        if let Some(is_featured) = patch.is_featured {
            post.is_featured = is_featured;
        }
        if let Some(tags) = patch.tags {
            post.tags = tags;
        }
        if let Some(status) = patch.status {
            post.status = status;
        }
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn count_all(&self) -> Result<u64, RepoError> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn count_by_status(&self, status: PostStatus) -> Result<u64, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.status == status)
            .count() as u64)
    }

    async fn total_views(&self) -> Result<i64, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .map(|p| i64::from(p.views))
            .sum())
    }
}

#[derive(Default)]
pub struct MemoryComments {
    rows: Mutex<Vec<Comment>>,
}

#[async_trait]
impl CommentRepository for MemoryComments {
    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        self.rows.lock().unwrap().push(comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, patch: CommentPatch) -> Result<Comment, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let comment = rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepoError::NotFound)?;
        if let Some(content) = patch.content {
            comment.content = content;
        }
        if let Some(status) = patch.status {
            comment.status = status;
        }
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.iter().any(|c| c.id == id) {
            return Err(RepoError::NotFound);
        }
        // Cascade like the store's ON DELETE CASCADE on parent_id.
        let mut doomed = vec![id];
        while let Some(next) = doomed.pop() {
            doomed.extend(
                rows.iter()
                    .filter(|c| c.parent_id == Some(next))
                    .map(|c| c.id),
            );
            rows.retain(|c| c.id != next);
        }
        Ok(())
    }

    async fn count_all(&self) -> Result<u64, RepoError> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn count_by_status(&self, status: CommentStatus) -> Result<u64, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.status == status)
            .count() as u64)
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        rows.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn mark_email_verified(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let user = rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RepoError::NotFound)?;
        user.email_verified = true;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn count_all(&self) -> Result<u64, RepoError> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn count_by_role(&self, role: UserRole) -> Result<u64, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.role == role)
            .count() as u64)
    }
}
