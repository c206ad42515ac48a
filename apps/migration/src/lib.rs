//! Schema migrations for the Quill blog backend.

pub use sea_orm_migration::prelude::*;

mod m20260801_000001_create_users_table;
mod m20260801_000002_create_posts_table;
mod m20260801_000003_create_comments_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_users_table::Migration),
            Box::new(m20260801_000002_create_posts_table::Migration),
            Box::new(m20260801_000003_create_comments_table::Migration),
        ]
    }
}
