//! # Quill Shared
//!
//! Types shared between the API surface and its clients: request DTOs and
//! the response envelopes every endpoint agrees on.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, MessageResponse};
