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

//! The slice of an incoming request that the authentication path needs:
//! building absolute URIs on the current host and setting the session expiry.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, Uri},
};

use crate::state::AppState;

/// Request-scoped context handed to authenticators.
pub trait RequestContext: Send {
    /// Absolute URI of `path` on the host that served the current request.
    fn build_absolute_uri(&self, path: &str) -> String;

    /// Make the session being established expire `seconds` from now.
    fn set_session_expiry(&mut self, seconds: u64);
}

/// [`RequestContext`] for an HTTP request served by this application.
#[derive(Debug, Clone)]
pub struct HttpRequestContext {
    scheme: String,
    host: String,
    session_expiry: Option<u64>,
}

impl HttpRequestContext {
    pub fn new(scheme: &str, host: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            session_expiry: None,
        }
    }

    /// Derive the host from the request URI authority (HTTP/2) or the
    /// `Host` header, falling back to `localhost`.
    pub fn from_request(uri: &Uri, headers: &HeaderMap, secure: bool) -> Self {
        let host = uri
            .authority()
            .map(|authority| authority.as_str().to_string())
            .or_else(|| {
                headers
                    .get(header::HOST)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "localhost".to_string());
        let scheme = if secure { "https" } else { "http" };
        Self::new(scheme, &host)
    }

    /// Expiry set by the last successful token exchange, in seconds.
    pub fn session_expiry(&self) -> Option<u64> {
        self.session_expiry
    }
}

impl RequestContext for HttpRequestContext {
    fn build_absolute_uri(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}://{}{}", self.scheme, self.host, path)
        } else {
            format!("{}://{}/{}", self.scheme, self.host, path)
        }
    }

    fn set_session_expiry(&mut self, seconds: u64) {
        self.session_expiry = Some(seconds);
    }
}

impl FromRequestParts<AppState> for HttpRequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_request(
            &parts.uri,
            &parts.headers,
            state.cookie_secure,
        ))
    }
}
