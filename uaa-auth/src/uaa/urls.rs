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

//! Effective endpoint resolution and redirect URL construction.

use url::Url;

use crate::config::UaaConfig;
use crate::request::RequestContext;

/// Route that receives the provider's redirect with the authorization code.
pub const CALLBACK_PATH: &str = "/auth/callback";
/// Authorize endpoint of the built-in development provider.
pub const FAKE_AUTH_PATH: &str = "/fake/oauth/authorize";
/// Token endpoint of the built-in development provider.
pub const FAKE_TOKEN_PATH: &str = "/fake/oauth/token";

/// Effective authorize endpoint.
///
/// Returns the configured URL, or the development provider's endpoint on the
/// current host. Without a configured URL and without a request there is
/// nothing to resolve against, so the result is `None`.
pub fn get_auth_url(config: &UaaConfig, request: Option<&dyn RequestContext>) -> Option<String> {
    resolve(config.auth_url.as_deref(), FAKE_AUTH_PATH, request)
}

/// Effective token endpoint. Same resolution rules as [`get_auth_url`].
pub fn get_token_url(config: &UaaConfig, request: Option<&dyn RequestContext>) -> Option<String> {
    resolve(config.token_url.as_deref(), FAKE_TOKEN_PATH, request)
}

fn resolve(
    configured: Option<&str>,
    fake_path: &str,
    request: Option<&dyn RequestContext>,
) -> Option<String> {
    match configured {
        Some(url) => Some(url.to_string()),
        None => request.map(|r| r.build_absolute_uri(fake_path)),
    }
}

/// Build the authorize redirect for the authorization-code flow.
///
/// Parameters are properly URL-encoded and appended to any query the
/// endpoint already carries.
pub fn build_authorize_url(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    state: &str,
) -> Result<String, url::ParseError> {
    let mut url = Url::parse(auth_url)?;
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("state", state);
    Ok(url.to_string())
}

/// Build the provider logout URL that sends the browser back to `return_to`.
pub fn build_logout_url(logout_url: &str, return_to: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(logout_url)?;
    url.query_pairs_mut().append_pair("redirect", return_to);
    Ok(url.to_string())
}
