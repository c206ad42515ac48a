//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! SeaORM-backed repositories, JWT + Argon2 authentication, and the
//! outbound mail stub.

pub mod auth;
pub mod database;
pub mod mail;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{DatabaseConfig, connect};
pub use mail::LogMailer;
