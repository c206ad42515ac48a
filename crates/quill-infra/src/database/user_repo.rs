//! SeaORM-backed user repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use quill_core::domain::{User, UserRole};
use quill_core::error::RepoError;
use quill_core::ports::UserRepository;

use super::entity::user::{self, Entity as UserEntity};

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let masked_local = if local.len() > 1 {
            format!("{}***", &local[..1])
        } else {
            "***".to_string()
        };
        format!("{masked_local}{domain}")
    } else {
        "***".to_string()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let active: user::ActiveModel = user.into();
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

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn mark_email_verified(&self, id: Uuid) -> Result<(), RepoError> {
        let result = UserEntity::update_many()
            .col_expr(user::Column::EmailVerified, Expr::value(true))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn count_all(&self) -> Result<u64, RepoError> {
        UserEntity::find()
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }

    async fn count_by_role(&self, role: UserRole) -> Result<u64, RepoError> {
        UserEntity::find()
            .filter(user::Column::Role.eq(user::Role::from(role)))
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_local_part_of_email() {
        assert_eq!(mask_email("reader@example.com"), "r***@example.com");
        assert_eq!(mask_email("a@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
