//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::UserRepository;
use quill_core::service::{CommentService, PostService};
use quill_infra::database::{
    DatabaseConfig, PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository,
    connect,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub comments: CommentService,
    pub users: Arc<dyn UserRepository>,
    /// Public base URL for links embedded in outbound mail.
    pub app_url: String,
}

impl AppState {
    /// Connect to the store and wire the services.
    pub async fn new(db_config: &DatabaseConfig, app_url: String) -> Result<Self, sea_orm::DbErr> {
        let db = connect(db_config).await?;

        let post_repo = Arc::new(PostgresPostRepository::new(db.clone()));
        let comment_repo = Arc::new(PostgresCommentRepository::new(db.clone()));
        let user_repo: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(db));

        tracing::info!("Application state initialized");

        Ok(Self {
            posts: PostService::new(post_repo.clone(), comment_repo.clone(), user_repo.clone()),
            comments: CommentService::new(comment_repo, post_repo),
            users: user_repo,
            app_url,
        })
    }
}
