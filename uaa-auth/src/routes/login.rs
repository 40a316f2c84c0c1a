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

//! Sign-in route handlers: login, callback, logout, profile.
//!
//! `/auth/login` sends the browser to the identity provider with a random
//! CSRF `state`, remembered in a short-lived cookie. `/auth/callback`
//! checks that state, runs the authenticator chain on the returned code,
//! and on success issues the session cookie.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use oauth2::CsrfToken;
use serde::Deserialize;
use uaa_auth_types::responses::ProfileResponse;
use uaa_auth_types::APIResponse;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::request::{HttpRequestContext, RequestContext};
use crate::session::{
    self, FALLBACK_SESSION_TTL_SECS, LOGIN_COOKIE_TTL_SECS, NEXT_COOKIE, SESSION_COOKIE,
    STATE_COOKIE,
};
use crate::state::AppState;
use crate::uaa::urls::{build_authorize_url, build_logout_url};
use crate::uaa::{get_auth_url, CALLBACK_PATH};

fn append_cookie(response: &mut Response, cookie: &str) -> Result<(), AppError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| AppError::internal(&format!("invalid Set-Cookie value: {e}")))?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the provider when the user declined or the request was invalid.
    pub error: Option<String>,
}

/// GET /auth/login?next=<path>
pub async fn login(
    State(state): State<AppState>,
    ctx: HttpRequestContext,
    Query(query): Query<LoginQuery>,
) -> Result<Response, AppError> {
    let auth_url = get_auth_url(&state.uaa, Some(&ctx))
        .ok_or_else(|| AppError::not_configured("no authorize endpoint"))?;

    let csrf_token = CsrfToken::new_random();
    let redirect_uri = ctx.build_absolute_uri(CALLBACK_PATH);
    let location = build_authorize_url(
        &auth_url,
        &state.uaa.client_id,
        &redirect_uri,
        csrf_token.secret(),
    )
    .map_err(|e| AppError::internal(&format!("invalid authorize URL {auth_url}: {e}")))?;

    let domain = state.cookie_domain.as_deref();
    let mut response = Redirect::to(&location).into_response();
    append_cookie(
        &mut response,
        &session::build_cookie(
            STATE_COOKIE,
            csrf_token.secret(),
            LOGIN_COOKIE_TTL_SECS,
            domain,
            state.cookie_secure,
        ),
    )?;
    match query.next.as_deref() {
        Some(next) if session::is_safe_next(next) => append_cookie(
            &mut response,
            &session::build_cookie(
                NEXT_COOKIE,
                next,
                LOGIN_COOKIE_TTL_SECS,
                domain,
                state.cookie_secure,
            ),
        )?,
        _ => append_cookie(
            &mut response,
            &session::build_clear_cookie(NEXT_COOKIE, domain, state.cookie_secure),
        )?,
    }
    Ok(response)
}

/// GET /auth/callback?code=...&state=...
pub async fn callback(
    State(state): State<AppState>,
    mut ctx: HttpRequestContext,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, AppError> {
    match (
        session::read_cookie(&headers, STATE_COOKIE),
        query.state.as_deref(),
    ) {
        (Some(expected), Some(received)) if expected == received => {}
        _ => return Err(AppError::invalid_state()),
    }

    if let Some(error) = query.error.as_deref() {
        tracing::info!("Identity provider returned {error} instead of a code");
        return Err(AppError::login_failed());
    }

    let Some(code) = query.code.as_deref().filter(|code| !code.is_empty()) else {
        return Err(AppError::bad_request("callback carried neither code nor error"));
    };

    let user = state
        .authenticators
        .authenticate(Some(code), Some(&mut ctx))
        .await
        .ok_or_else(AppError::login_failed)?;

    let ttl_secs = ctx
        .session_expiry()
        .map_or(FALLBACK_SESSION_TTL_SECS, |secs| {
            i64::try_from(secs).unwrap_or(i64::MAX)
        });
    let session_jwt = session::generate_session_token(&state.session_secret, &user, ttl_secs)?;

    let next = session::read_cookie(&headers, NEXT_COOKIE)
        .filter(|next| session::is_safe_next(next))
        .unwrap_or("/");

    tracing::info!(
        user_id = user.id,
        "UAA login successful, session expires in {ttl_secs}s, redirecting to {next}"
    );

    let domain = state.cookie_domain.as_deref();
    let secure = state.cookie_secure;
    let mut response = Redirect::to(next).into_response();
    append_cookie(
        &mut response,
        &session::build_cookie(SESSION_COOKIE, &session_jwt, ttl_secs, domain, secure),
    )?;
    append_cookie(
        &mut response,
        &session::build_clear_cookie(STATE_COOKIE, domain, secure),
    )?;
    append_cookie(
        &mut response,
        &session::build_clear_cookie(NEXT_COOKIE, domain, secure),
    )?;
    Ok(response)
}

/// GET /auth/logout -- clears the session cookie and, when configured,
/// signs the user out of the identity provider as well.
pub async fn logout(
    State(state): State<AppState>,
    ctx: HttpRequestContext,
) -> Result<Response, AppError> {
    let location = match state.uaa.logout_url.as_deref() {
        Some(url) => build_logout_url(url, &ctx.build_absolute_uri("/"))
            .map_err(|e| AppError::internal(&format!("invalid logout URL {url}: {e}")))?,
        None => "/".to_string(),
    };

    let mut response = Redirect::to(&location).into_response();
    append_cookie(
        &mut response,
        &session::build_clear_cookie(
            SESSION_COOKIE,
            state.cookie_domain.as_deref(),
            state.cookie_secure,
        ),
    )?;
    Ok(response)
}

/// GET /auth/profile -- the signed-in user's account.
pub async fn profile(AuthUser(user): AuthUser) -> Json<APIResponse<ProfileResponse>> {
    Json(APIResponse::ok(ProfileResponse {
        id: user.id,
        username: user.username,
        email: user.email,
    }))
}
