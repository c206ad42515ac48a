//! Authentication handlers: email/password sign-up and sign-in plus the
//! email-verification callback. Social login is handled by an external
//! identity provider and never reaches this service.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use quill_core::domain::User;
use quill_core::ports::{Mailer, PasswordService, TokenService};
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterRequest, VerifyEmailQuery};
use quill_shared::response::MessageResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    mailer: web::Data<Arc<dyn Mailer>>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate input
    let mut problems = Vec::new();
    if req.name.trim().is_empty() {
        problems.push("Name is required".to_string());
    }
    if req.email.is_empty() || !req.email.contains('@') {
        problems.push("Invalid email address".to_string());
    }
    if req.password.len() < 8 {
        problems.push("Password must be at least 8 characters".to_string());
    }
    if !problems.is_empty() {
        return Err(AppError::Validation(problems));
    }

    // Check if user already exists
    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    // Hash password
    let password_hash = password_service.hash(&req.password)?;

    // Create user - unverified until the emailed link is followed
    let user = User::new(req.name, req.email, password_hash, req.phone);
    let saved = state.users.insert(user).await?;

    let token = token_service.generate_token(saved.id, &saved.email, saved.role)?;
    let link = format!("{}/api/auth/verify-email?token={token}", state.app_url);
    mailer
        .send_verification(&saved.email, &saved.name, &link)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Created().json(MessageResponse::ok("Verification email sent")))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Find user by email
    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    // Verify password
    let valid = password_service.verify(&req.password, &user.password_hash)?;
    if !valid {
        return Err(AppError::Unauthorized);
    }

    if !user.email_verified {
        return Err(AppError::Forbidden("Email is not verified".to_string()));
    }

    // Generate token
    let token = token_service.generate_token(user.id, &user.email, user.role)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
    }))
}

/// GET /api/auth/verify-email?token=...
pub async fn verify_email(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    query: web::Query<VerifyEmailQuery>,
) -> AppResult<HttpResponse> {
    let claims = token_service.validate_token(&query.token)?;

    state
        .users
        .mark_email_verified(claims.user_id)
        .await
        .map_err(|e| match e {
            quill_core::error::RepoError::NotFound => {
                AppError::NotFound("User not found".to_string())
            }
            other => other.into(),
        })?;

    Ok(HttpResponse::Ok().json(MessageResponse::ok("Email verified successfully")))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(user))
}
