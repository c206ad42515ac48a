use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EnumParseError;

/// Role granted to a user account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[default]
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "ADMIN")]
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::User => write!(f, "USER"),
            UserRole::Admin => write!(f, "ADMIN"),
        }
    }
}

impl FromStr for UserRole {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(UserRole::User),
            "ADMIN" => Ok(UserRole::Admin),
            other => Err(EnumParseError {
                kind: "user role",
                value: other.to_string(),
            }),
        }
    }
}

/// Account status. Only ACTIVE exists today; suspension would extend this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    #[default]
    #[serde(rename = "ACTIVE")]
    Active,
}

/// User entity - represents an account in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub email_verified: bool,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new unverified USER account with generated id and timestamps.
    pub fn new(name: String, email: String, password_hash: String, phone: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role: UserRole::User,
            status: UserStatus::Active,
            email_verified: false,
            phone,
            created_at: now,
            updated_at: now,
        }
    }
}
