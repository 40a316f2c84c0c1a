/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! API error types.
//!
//! Every failed API response is returned as `APIResponse<APIError>` with `success: false`.

use serde::{Deserialize, Serialize};

/// Structured error returned in the `result` field of a failed [`super::APIResponse`].
///
/// The `code` field is a machine-readable identifier (e.g. `"INVALID_STATE"`).
/// The `message` field is a human-readable description suitable for display.
/// The `engineering_error` field carries debug-level detail that is useful
/// during development but should be stripped or redacted in production.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct APIError {
    /// Machine-readable error code (e.g. `"UNAUTHORIZED"`, `"INVALID_STATE"`).
    pub code: String,

    /// Human-readable error message.
    pub message: String,

    /// Optional engineering-level detail for debugging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engineering_error: Option<String>,
}

impl APIError {
    pub fn unauthorized() -> Self {
        Self {
            code: "UNAUTHORIZED".to_string(),
            message: "Authentication required.".to_string(),
            engineering_error: None,
        }
    }

    pub fn login_failed() -> Self {
        Self {
            code: "LOGIN_FAILED".to_string(),
            message: "Sign-in with the identity provider did not match a local account."
                .to_string(),
            engineering_error: None,
        }
    }

    pub fn invalid_state() -> Self {
        Self {
            code: "INVALID_STATE".to_string(),
            message: "The sign-in request expired or did not originate here. Please try again."
                .to_string(),
            engineering_error: None,
        }
    }

    pub fn bad_request(detail: &str) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: format!("Bad request: {detail}"),
            engineering_error: None,
        }
    }

    pub fn not_configured(detail: &str) -> Self {
        Self {
            code: "NOT_CONFIGURED".to_string(),
            message: "The identity provider is not configured for this request.".to_string(),
            engineering_error: Some(detail.to_string()),
        }
    }

    pub fn internal_error(detail: &str) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: "Internal server error".to_string(),
            engineering_error: Some(detail.to_string()),
        }
    }
}

impl std::fmt::Display for APIError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for APIError {}
