//! Comment entity for SeaORM. `parent_id` is a self-reference forming the
//! reply thread; the schema cascades deletes down the thread.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::{self, CommentStatus};

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Status {
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECT")]
    Reject,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub author_id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub status: Status,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Parent,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Status> for CommentStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Approved => CommentStatus::Approved,
            Status::Reject => CommentStatus::Reject,
        }
    }
}

impl From<CommentStatus> for Status {
    fn from(status: CommentStatus) -> Self {
        match status {
            CommentStatus::Approved => Status::Approved,
            CommentStatus::Reject => Status::Reject,
        }
    }
}

/// Conversion from SeaORM Model to domain Comment.
impl From<Model> for domain::Comment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            content: model.content,
            author_id: model.author_id,
            post_id: model.post_id,
            parent_id: model.parent_id,
            status: model.status.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from domain Comment to SeaORM ActiveModel.
impl From<domain::Comment> for ActiveModel {
    fn from(comment: domain::Comment) -> Self {
        Self {
            id: Set(comment.id),
            content: Set(comment.content),
            author_id: Set(comment.author_id),
            post_id: Set(comment.post_id),
            parent_id: Set(comment.parent_id),
            status: Set(comment.status.into()),
            created_at: Set(comment.created_at.into()),
            updated_at: Set(comment.updated_at.into()),
        }
    }
}
