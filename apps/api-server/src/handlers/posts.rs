//! Post handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use quill_core::domain::{NewPost, PostFilter, PostStatus, PostUpdate, UserRole, authorize};
use quill_core::pagination::{PageParams, RawPageParams};
use quill_shared::response::MessageResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Query string for GET /posts. Paging fields stay raw strings so that
/// malformed values fall back to defaults instead of failing the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListPostsQuery {
    pub search: Option<String>,
    /// Comma-separated tag list.
    pub tags: Option<String>,
    pub is_featured: Option<String>,
    pub status: Option<String>,
    pub author_id: Option<Uuid>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListPostsQuery {
    fn into_filter(self) -> Result<PostFilter, AppError> {
        let tags = self
            .tags
            .map(|raw| {
                raw.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let is_featured = match self.is_featured.as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };

        let status = match self.status.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<PostStatus>()
                    .map_err(|e| AppError::BadRequest(e.to_string()))?,
            ),
        };

        let page = PageParams::normalize(RawPageParams {
            page: self.page,
            limit: self.limit,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
        });

        Ok(PostFilter {
            search: self.search,
            tags,
            is_featured,
            status,
            author_id: self.author_id,
            page,
        })
    }
}

/// GET /posts - public listing with search, filters, pagination, sorting.
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let filter = query.into_inner().into_filter()?;
    let page = state.posts.list_posts(filter).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<NewPost>,
) -> AppResult<HttpResponse> {
    let principal = identity.principal();
    if !authorize(&principal, &[UserRole::User, UserRole::Admin]) {
        return Err(AppError::Forbidden("Insufficient role".to_string()));
    }

    let post = state.posts.create_post(body.into_inner(), &principal).await?;
    Ok(HttpResponse::Created().json(post))
}

/// GET /posts/{post_id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// GET /posts/my-posts - every post of the logged-in author.
pub async fn my_posts(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let principal = identity.principal();
    if !authorize(&principal, &[UserRole::User, UserRole::Admin]) {
        return Err(AppError::Forbidden("Insufficient role".to_string()));
    }

    let posts = state.posts.my_posts(principal.id).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /posts/stats - admin-only aggregate counters.
pub async fn stats(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let principal = identity.principal();
    if !authorize(&principal, &[UserRole::Admin]) {
        return Err(AppError::Forbidden("Insufficient role".to_string()));
    }

    let stats = state.posts.stats(&principal).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// PATCH /posts/{post_id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostUpdate>,
) -> AppResult<HttpResponse> {
    let principal = identity.principal();
    if !authorize(&principal, &[UserRole::User, UserRole::Admin]) {
        return Err(AppError::Forbidden("Insufficient role".to_string()));
    }

    let post = state
        .posts
        .update_post(path.into_inner(), body.into_inner(), &principal)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /posts/{post_id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let principal = identity.principal();
    if !authorize(&principal, &[UserRole::User, UserRole::Admin]) {
        return Err(AppError::Forbidden("Insufficient role".to_string()));
    }

    state
        .posts
        .delete_post(path.into_inner(), &principal)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Post deleted successfully")))
}
