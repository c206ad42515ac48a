//! SeaORM-backed post repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgBinOper;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, EntityTrait, IntoActiveModel, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Post, PostFilter, PostPatch, PostStatus};
use quill_core::error::RepoError;
use quill_core::pagination::SortOrder;
use quill_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// Map the caller-supplied sort field onto a real column. Unknown names
/// fall back to the creation timestamp.
fn sort_column(name: &str) -> post::Column {
    match name {
        "updatedAt" => post::Column::UpdatedAt,
        "title" => post::Column::Title,
        "views" => post::Column::Views,
        "status" => post::Column::Status,
        _ => post::Column::CreatedAt,
    }
}

/// Build the WHERE clause for the listing query. Search is a
/// case-insensitive substring match over title OR content; the tag filter
/// is an array overlap, i.e. ANY of the requested tags qualifies.
fn filter_condition(filter: &PostFilter) -> Condition {
    let mut cond = Condition::all();

    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        cond = cond.add(
            Condition::any()
                .add(Expr::col(post::Column::Title).binary(PgBinOper::ILike, pattern.clone()))
                .add(Expr::col(post::Column::Content).binary(PgBinOper::ILike, pattern)),
        );
    }
    if !filter.tags.is_empty() {
        cond = cond.add(Expr::col(post::Column::Tags).binary(PgBinOper::Overlap, filter.tags.clone()));
    }
    if let Some(is_featured) = filter.is_featured {
        cond = cond.add(post::Column::IsFeatured.eq(is_featured));
    }
    if let Some(status) = filter.status {
        cond = cond.add(post::Column::Status.eq(post::Status::from(status)));
    }
    if let Some(author_id) = filter.author_id {
        cond = cond.add(post::Column::AuthorId.eq(author_id));
    }

    cond
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let active: post::ActiveModel = post.into();
        let model = active.insert(&self.db).await.map_err(|e| {
            let err_str = e.to_string();
            if err_str.contains("duplicate") || err_str.contains("unique") {
                RepoError::Constraint("Entity already exists".to_string())
            } else {
                RepoError::Query(err_str)
            }
        })?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn find_page(&self, filter: &PostFilter) -> Result<(Vec<Post>, u64), RepoError> {
        let cond = filter_condition(filter);

        let total = PostEntity::find()
            .filter(cond.clone())
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        let order = match filter.page.sort_order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        let rows = PostEntity::find()
            .filter(cond)
            .order_by(sort_column(&filter.page.sort_by), order)
            // Deterministic tie-break for stable pages.
            .order_by(post::Column::Id, Order::Asc)
            .offset(filter.page.skip)
            .limit(filter.page.limit)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let rows = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by(post::Column::CreatedAt, Order::Desc)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Post, RepoError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        let model = PostEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?
            .ok_or(RepoError::NotFound)?;

        let mut active = model.into_active_model();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(content) = patch.content {
            active.content = Set(content);
        }
        if let Some(thumbnail) = patch.thumbnail {
            active.thumbnail = Set(Some(thumbnail));
        }
        if let Some(is_featured) = patch.is_featured {
            active.is_featured = Set(is_featured);
        }
        if let Some(tags) = patch.tags {
            active.tags = Set(tags);
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
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn count_all(&self) -> Result<u64, RepoError> {
        PostEntity::find()
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }

    async fn count_by_status(&self, status: PostStatus) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post::Column::Status.eq(post::Status::from(status)))
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }

    async fn total_views(&self) -> Result<i64, RepoError> {
        let total: Option<Option<i64>> = PostEntity::find()
            .select_only()
            .column_as(post::Column::Views.sum(), "total_views")
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(total.flatten().unwrap_or(0))
    }
}
