use quill_core::domain::{Comment, CommentPatch, CommentStatus, Post};
use quill_core::ports::{CommentRepository, PostRepository, UserRepository};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

use crate::database::entity::{comment, post, user};
use crate::database::{PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository};

fn post_model(id: uuid::Uuid) -> post::Model {
    let now = chrono::Utc::now();
    post::Model {
        id,
        title: "Test Post".to_owned(),
        content: "Content".to_owned(),
        thumbnail: None,
        is_featured: false,
        status: post::Status::Draft,
        tags: vec!["rust".to_owned()],
        views: 0,
        author_id: Some(uuid::Uuid::new_v4()),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn find_post_by_id_maps_to_domain() {
    let post_id = uuid::Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post_id)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    assert!(result.is_some());
    let post = result.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.tags, vec!["rust".to_owned()]);
}

#[tokio::test]
async fn update_comment_refreshes_row_inside_transaction() {
    let comment_id = uuid::Uuid::new_v4();
    let now = chrono::Utc::now();
    let found = comment::Model {
        id: comment_id,
        content: "First!".to_owned(),
        author_id: uuid::Uuid::new_v4(),
        post_id: uuid::Uuid::new_v4(),
        parent_id: None,
        status: comment::Status::Approved,
        created_at: now.into(),
        updated_at: now.into(),
    };
    let updated = comment::Model {
        status: comment::Status::Reject,
        ..found.clone()
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![found]])
        .append_query_results(vec![vec![updated]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);

    let result: Comment = repo
        .update(
            comment_id,
            CommentPatch {
                content: None,
                status: Some(CommentStatus::Reject),
            },
        )
        .await
        .unwrap();

    assert_eq!(result.status, CommentStatus::Reject);
    assert_eq!(result.id, comment_id);
}

#[tokio::test]
async fn find_user_by_email_maps_to_domain() {
    let now = chrono::Utc::now();
    let model = user::Model {
        id: uuid::Uuid::new_v4(),
        name: "Reader".to_owned(),
        email: "reader@example.com".to_owned(),
        password_hash: "hash".to_owned(),
        role: user::Role::User,
        status: user::Status::Active,
        email_verified: true,
        phone: None,
        created_at: now.into(),
        updated_at: now.into(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let user = repo.find_by_email("reader@example.com").await.unwrap();

    assert!(user.is_some());
    assert_eq!(user.unwrap().name, "Reader");
}

#[tokio::test]
async fn delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let err = repo.delete(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, quill_core::error::RepoError::NotFound));
}
