//! SeaORM-backed comment repository. Reply cleanup on delete is handled by
//! the schema's ON DELETE CASCADE on `parent_id`.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, IntoActiveModel, Order, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Comment, CommentPatch, CommentStatus};
use quill_core::error::RepoError;
use quill_core::ports::CommentRepository;

use super::entity::comment::{self, Entity as CommentEntity};

/// PostgreSQL comment repository.
pub struct PostgresCommentRepository {
    db: DbConn,
}

impl PostgresCommentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let active: comment::ActiveModel = comment.into();
        let model = active.insert(&self.db).await.map_err(|e| {
            let err_str = e.to_string();
            if err_str.contains("foreign key") || err_str.contains("violates") {
                RepoError::Constraint(err_str)
            } else {
                RepoError::Query(err_str)
            }
        })?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let result = CommentEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::AuthorId.eq(author_id))
            .order_by(comment::Column::CreatedAt, Order::Desc)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, patch: CommentPatch) -> Result<Comment, RepoError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        let model = CommentEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?
            .ok_or(RepoError::NotFound)?;

        let mut active = model.into_active_model();
        if let Some(content) = patch.content {
            active.content = Set(content);
        }
        if let Some(status) = patch.status {
            active.status = Set(status.into());
        }
        active.updated_at = Set(Utc::now().into());

        let model = active
            .update(&txn)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;
        txn.commit()
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = CommentEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn count_all(&self) -> Result<u64, RepoError> {
        CommentEntity::find()
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }

    async fn count_by_status(&self, status: CommentStatus) -> Result<u64, RepoError> {
        CommentEntity::find()
            .filter(comment::Column::Status.eq(comment::Status::from(status)))
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }
}
