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

//! Development stand-in for the UAA authorize and token endpoints.
//!
//! Mounted only when the configuration selects the fake provider, which in
//! turn requires debug mode. The "authorization code" is simply the email
//! address to sign in as.

use axum::{
    extract::{rejection::FormRejection, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use uaa_auth_types::requests::{AuthorizeQuery, TokenRequest};
use uaa_auth_types::responses::{OAuthErrorResponse, TokenResponse};
use uaa_auth_types::IdentityClaims;

use crate::config::TokenTrust;
use crate::request::{HttpRequestContext, RequestContext};
use crate::state::AppState;
use crate::uaa::{CALLBACK_PATH, FAKE_AUTH_PATH};

/// Lifetime of tokens minted by the fake token endpoint.
pub const FAKE_TOKEN_EXPIRES_IN: u64 = 600;

const FAKE_SIGNING_KEY: &str = "fake-uaa-signing-key";

fn oauth_error(status: StatusCode, error: &str, description: &str) -> Response {
    (status, Json(OAuthErrorResponse::new(error, description))).into_response()
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn hidden_input(name: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => format!(
            r#"<input type="hidden" name="{name}" value="{}">"#,
            escape_html(value)
        ),
        None => String::new(),
    }
}

fn login_page(query: &AuthorizeQuery) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Fake UAA login</title></head>
<body>
<h1>Fake UAA login</h1>
<p>This provider is for development only. Enter the email address to sign in as.</p>
<form method="get" action="{action}">
{client_id}
{response_type}
{redirect_uri}
{state}
<label for="email">Email</label>
<input type="email" id="email" name="email" autofocus required>
<button type="submit">Sign in</button>
</form>
</body>
</html>
"#,
        action = FAKE_AUTH_PATH,
        client_id = hidden_input("client_id", query.client_id.as_deref()),
        response_type = hidden_input("response_type", query.response_type.as_deref()),
        redirect_uri = hidden_input("redirect_uri", query.redirect_uri.as_deref()),
        state = hidden_input("state", query.state.as_deref()),
    )
}

/// GET /fake/oauth/authorize
///
/// Without `email` renders a sign-in form; with `email` redirects (302) back
/// to `redirect_uri` carrying the email as the code.
pub async fn authorize(
    State(state): State<AppState>,
    ctx: HttpRequestContext,
    Query(query): Query<AuthorizeQuery>,
) -> Response {
    if query.client_id.as_deref() != Some(state.uaa.client_id.as_str()) {
        return oauth_error(
            StatusCode::BAD_REQUEST,
            "invalid_client",
            "unknown client_id",
        );
    }
    if let Some(response_type) = query.response_type.as_deref() {
        if response_type != "code" {
            return oauth_error(
                StatusCode::BAD_REQUEST,
                "unsupported_response_type",
                "only response_type=code is supported",
            );
        }
    }

    let email = match query.email.as_deref() {
        Some(email) if !email.trim().is_empty() => email.trim(),
        _ => return Html(login_page(&query)).into_response(),
    };

    let redirect_uri = query
        .redirect_uri
        .clone()
        .unwrap_or_else(|| ctx.build_absolute_uri(CALLBACK_PATH));
    let mut location = match url::Url::parse(&redirect_uri) {
        Ok(url) => url,
        Err(e) => {
            return oauth_error(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                &format!("invalid redirect_uri: {e}"),
            )
        }
    };
    {
        let mut pairs = location.query_pairs_mut();
        pairs.append_pair("code", email);
        if let Some(csrf_state) = query.state.as_deref() {
            pairs.append_pair("state", csrf_state);
        }
    }

    tracing::debug!("Fake UAA authorizing {email}");
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// POST /fake/oauth/token
///
/// Returns an access token whose `email` claim is the submitted code.
pub async fn token(
    State(state): State<AppState>,
    form: Result<Form<TokenRequest>, FormRejection>,
) -> Response {
    let Form(request) = match form {
        Ok(form) => form,
        Err(rejection) => {
            return oauth_error(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                &rejection.body_text(),
            )
        }
    };

    if request.grant_type != TokenRequest::GRANT_TYPE {
        return oauth_error(
            StatusCode::BAD_REQUEST,
            "unsupported_grant_type",
            "only authorization_code is supported",
        );
    }
    if request.client_id != state.uaa.client_id
        || request.client_secret != state.uaa.client_secret
    {
        return oauth_error(
            StatusCode::UNAUTHORIZED,
            "invalid_client",
            "bad client credentials",
        );
    }
    if request.code.trim().is_empty() {
        return oauth_error(StatusCode::BAD_REQUEST, "invalid_request", "missing code");
    }

    let signing_key = match &state.uaa.token_trust {
        TokenTrust::SharedSecret(secret) => secret.as_str(),
        TokenTrust::Channel => FAKE_SIGNING_KEY,
    };
    let exp = chrono::Utc::now().timestamp() + FAKE_TOKEN_EXPIRES_IN as i64;
    let claims = IdentityClaims {
        exp: Some(exp),
        ..IdentityClaims::for_email(request.code.trim())
    };
    let access_token = match encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(signing_key.as_bytes()),
    ) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Fake UAA failed to sign access token: {e}");
            return oauth_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
                "failed to sign access token",
            );
        }
    };

    Json(TokenResponse {
        access_token,
        expires_in: FAKE_TOKEN_EXPIRES_IN,
        token_type: Some("bearer".to_string()),
    })
    .into_response()
}
