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

//! Authorization code → access token exchange.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use uaa_auth_types::requests::TokenRequest;
use uaa_auth_types::responses::TokenResponse;

use crate::config::UaaConfig;
use crate::request::RequestContext;

use super::urls::{get_token_url, CALLBACK_PATH};

/// Turns an authorization code into an access token.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Exchange `code` for an access token.
    ///
    /// On success the session expiry of `request` is set to the token
    /// lifetime. `None` means the code cannot be used to authenticate; the
    /// caller must not retry with the same code.
    async fn exchange_code_for_access_token(
        &self,
        request: &mut dyn RequestContext,
        code: &str,
    ) -> Option<String>;
}

/// [`TokenExchange`] against the configured UAA token endpoint.
pub struct UaaTokenClient {
    http: reqwest::Client,
    config: Arc<UaaConfig>,
}

impl UaaTokenClient {
    /// Build a client whose requests are bounded by `config.request_timeout`.
    pub fn new(config: Arc<UaaConfig>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl TokenExchange for UaaTokenClient {
    async fn exchange_code_for_access_token(
        &self,
        request: &mut dyn RequestContext,
        code: &str,
    ) -> Option<String> {
        let token_url = get_token_url(&self.config, Some(&*request))?;
        let redirect_uri = request.build_absolute_uri(CALLBACK_PATH);
        let form = TokenRequest::authorization_code(
            &self.config.client_id,
            &self.config.client_secret,
            code,
            &redirect_uri,
        );

        let response = match self.http.post(&token_url).form(&form).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("POST {token_url} failed: {e}");
                return None;
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("POST {token_url} returned {status} but the body was unreadable: {e}");
                return None;
            }
        };

        if status != StatusCode::OK {
            tracing::warn!(
                "POST {token_url} returned {} w/ content {body:?}",
                status.as_u16()
            );
            return None;
        }

        let token: TokenResponse = match serde_json::from_slice(&body) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("POST {token_url} returned an unusable token response: {e}");
                return None;
            }
        };

        request.set_session_expiry(token.expires_in);
        Some(token.access_token)
    }
}
