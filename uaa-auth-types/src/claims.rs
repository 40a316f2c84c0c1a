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

//! JWT payloads.
//!
//! [`IdentityClaims`] is what the identity provider embeds in the access
//! token. [`SessionClaims`] is what the backend signs into its own session
//! cookie once a local user has been resolved.

use serde::{Deserialize, Serialize};

/// Identity carried by a UAA access token.
///
/// Only `email` is required; UAA also sends `user_name`, `user_id`, `exp`
/// and friends, which are kept when present but never relied upon.
///
/// # Example payload
///
/// ```json
/// { "email": "foo@example.org", "user_name": "foo", "exp": 1707004800 }
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl IdentityClaims {
    pub fn for_email(email: &str) -> Self {
        Self {
            email: email.to_string(),
            user_name: None,
            user_id: None,
            exp: None,
        }
    }
}

/// Payload of the backend's signed session cookie.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Local user id, as a string.
    pub sub: String,
    pub email: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    pub iss: String,
}

impl SessionClaims {
    pub const ISSUER: &'static str = "uaa-auth-session";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_claims_require_email() {
        let parsed = serde_json::from_str::<IdentityClaims>(r#"{"user_name":"foo"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn identity_claims_ignore_unknown_fields() {
        let parsed: IdentityClaims = serde_json::from_str(
            r#"{"email":"a@b.org","scope":["openid"],"aud":["cloud_controller"]}"#,
        )
        .unwrap();
        assert_eq!(parsed.email, "a@b.org");
    }
}
