//! Standardized API response envelopes.

use serde::{Deserialize, Serialize};

/// Client-facing error body: `{success: false, message, errors?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// Confirmation body for operations that return no entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_omits_empty_detail_list() {
        let json = serde_json::to_value(ErrorResponse::new("Post not found")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "message": "Post not found"})
        );
    }

    #[test]
    fn error_body_carries_detail_list_when_present() {
        let json = serde_json::to_value(
            ErrorResponse::new("Validation failed").with_errors(vec!["Title is required".into()]),
        )
        .unwrap();
        assert_eq!(json["errors"][0], "Title is required");
    }
}
