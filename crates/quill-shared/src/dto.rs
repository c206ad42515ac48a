//! Data Transfer Objects - request/response types for the auth surface.

use serde::{Deserialize, Serialize};

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Request to sign in with email and password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Query string for the email-verification callback.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: String,
}
