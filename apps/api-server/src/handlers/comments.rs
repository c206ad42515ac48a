//! Comment handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use quill_core::domain::{CommentUpdate, NewComment, UserRole, authorize};
use quill_shared::response::MessageResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Body for PATCH /comments/{id}/moderate. `status` stays raw so the
/// service can reject anything outside APPROVED/REJECT.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ModerateRequest {
    pub status: Option<String>,
}

/// POST /comments
pub async fn create_comment(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<NewComment>,
) -> AppResult<HttpResponse> {
    let principal = identity.principal();
    if !authorize(&principal, &[UserRole::User, UserRole::Admin]) {
        return Err(AppError::Forbidden("Insufficient role".to_string()));
    }

    let comment = state
        .comments
        .create_comment(body.into_inner(), &principal)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

/// GET /comments/{comment_id}
pub async fn get_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment = state.comments.get_comment(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comment))
}

/// GET /comments/author/{author_id}
pub async fn comments_by_author(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comments = state
        .comments
        .comments_by_author(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// PATCH /comments/{comment_id}
pub async fn update_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentUpdate>,
) -> AppResult<HttpResponse> {
    let principal = identity.principal();
    if !authorize(&principal, &[UserRole::User, UserRole::Admin]) {
        return Err(AppError::Forbidden("Insufficient role".to_string()));
    }

    let comment = state
        .comments
        .update_comment(path.into_inner(), body.into_inner(), &principal)
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

/// DELETE /comments/{comment_id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let principal = identity.principal();
    if !authorize(&principal, &[UserRole::User, UserRole::Admin]) {
        return Err(AppError::Forbidden("Insufficient role".to_string()));
    }

    state
        .comments
        .delete_comment(path.into_inner(), &principal)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Comment deleted successfully")))
}

/// PATCH /comments/{comment_id}/moderate - admin-only status transition.
pub async fn moderate_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<ModerateRequest>,
) -> AppResult<HttpResponse> {
    let principal = identity.principal();
    if !authorize(&principal, &[UserRole::Admin]) {
        return Err(AppError::Forbidden("Insufficient role".to_string()));
    }

    let comment = state
        .comments
        .moderate_comment(path.into_inner(), body.status.as_deref(), &principal)
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}
