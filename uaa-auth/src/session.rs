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

//! Session cookies.
//!
//! After a successful login the callback issues a **signed session JWT**
//! inside an `HttpOnly; SameSite=Lax` cookie named `session`. Its lifetime
//! is the access token's `expires_in`, so the local session never outlives
//! the identity that established it.

use axum::http::{header, HeaderMap};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uaa_auth_types::SessionClaims;

use crate::error::AppError;
use crate::users::LocalUser;

pub const SESSION_COOKIE: &str = "session";
/// CSRF `state` of an in-flight login.
pub const STATE_COOKIE: &str = "uaa_state";
/// Where to send the browser after an in-flight login completes.
pub const NEXT_COOKIE: &str = "uaa_next";
/// Lifetime of the in-flight login cookies.
pub const LOGIN_COOKIE_TTL_SECS: i64 = 600;
/// Session lifetime for backends that do not set an expiry of their own.
pub const FALLBACK_SESSION_TTL_SECS: i64 = 3600;

/// Sign a session token for `user` that expires `ttl_secs` from now.
pub fn generate_session_token(
    secret: &str,
    user: &LocalUser,
    ttl_secs: i64,
) -> Result<String, AppError> {
    let claims = SessionClaims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        exp: Utc::now().timestamp().saturating_add(ttl_secs),
        iss: SessionClaims::ISSUER.to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("Failed to sign session JWT: {e}");
        AppError::internal("failed to generate session token")
    })
}

/// Verify a session token's signature, issuer and expiry.
pub fn decode_session_token(secret: &str, token: &str) -> Result<SessionClaims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[SessionClaims::ISSUER]);
    validation.leeway = 0;

    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("Rejected session token: {e}");
        AppError::unauthorized()
    })
}

/// Build a `Set-Cookie` header value.
pub fn build_cookie(
    name: &str,
    value: &str,
    max_age_secs: i64,
    domain: Option<&str>,
    secure: bool,
) -> String {
    let mut cookie =
        format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    if let Some(d) = domain {
        cookie.push_str(&format!("; Domain={d}"));
    }
    cookie
}

/// Build a `Set-Cookie` header value that clears the named cookie.
pub fn build_clear_cookie(name: &str, domain: Option<&str>, secure: bool) -> String {
    build_cookie(name, "", 0, domain, secure)
}

/// Read a cookie value from the request headers. Empty values count as absent.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Whether `next` is a same-site path that is safe to redirect to and to
/// store verbatim in a cookie.
pub fn is_safe_next(next: &str) -> bool {
    next.starts_with('/')
        && !next.starts_with("//")
        && !next.starts_with("/\\")
        && next
            .chars()
            .all(|c| c.is_ascii_graphic() && !matches!(c, ';' | ',' | '"' | '\\'))
}
