//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::{self, PostStatus};

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Status {
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "PUBLISHED")]
    Published,
    #[sea_orm(string_value = "ARCHIVED")]
    Archived,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub thumbnail: Option<String>,
    pub is_featured: bool,
    pub status: Status,
    pub tags: Vec<String>,
    pub views: i32,
    pub author_id: Option<Uuid>,
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
        on_delete = "SetNull"
    )]
    Author,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Status> for PostStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Draft => PostStatus::Draft,
            Status::Published => PostStatus::Published,
            Status::Archived => PostStatus::Archived,
        }
    }
}

impl From<PostStatus> for Status {
    fn from(status: PostStatus) -> Self {
        match status {
            PostStatus::Draft => Status::Draft,
            PostStatus::Published => Status::Published,
            PostStatus::Archived => Status::Archived,
        }
    }
}

/// Conversion from SeaORM Model to domain Post.
impl From<Model> for domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            thumbnail: model.thumbnail,
            is_featured: model.is_featured,
            status: model.status.into(),
            tags: model.tags,
            views: model.views,
            author_id: model.author_id,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from domain Post to SeaORM ActiveModel.
impl From<domain::Post> for ActiveModel {
    fn from(post: domain::Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title),
            content: Set(post.content),
            thumbnail: Set(post.thumbnail),
            is_featured: Set(post.is_featured),
            status: Set(post.status.into()),
            tags: Set(post.tags),
            views: Set(post.views),
            author_id: Set(post.author_id),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
