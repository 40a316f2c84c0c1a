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

//! Request types for the identity provider's OAuth endpoints.
//!
//! These types define the shape of form bodies and query parameters. The
//! backend serializes them when talking to the provider; the development
//! provider deserializes them.

use serde::{Deserialize, Serialize};

/// Form body for `POST <token_url>` in the authorization-code grant.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    pub client_id: String,
    pub client_secret: String,
    /// Always [`TokenRequest::GRANT_TYPE`] when sent by the backend.
    pub grant_type: String,
    /// Always [`TokenRequest::RESPONSE_TYPE`] when sent by the backend.
    #[serde(default)]
    pub response_type: Option<String>,
    pub code: String,
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

impl TokenRequest {
    pub const GRANT_TYPE: &'static str = "authorization_code";
    pub const RESPONSE_TYPE: &'static str = "token";

    /// Build an authorization-code exchange request.
    pub fn authorization_code(
        client_id: &str,
        client_secret: &str,
        code: &str,
        redirect_uri: &str,
    ) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            grant_type: Self::GRANT_TYPE.to_string(),
            response_type: Some(Self::RESPONSE_TYPE.to_string()),
            code: code.to_string(),
            redirect_uri: Some(redirect_uri.to_string()),
        }
    }
}

/// Query parameters for `GET <auth_url>`.
///
/// `email` is only understood by the development provider, which skips its
/// sign-in form when it is present.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AuthorizeQuery {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub response_type: Option<String>,
    #[serde(default)]
    pub redirect_uri: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}
