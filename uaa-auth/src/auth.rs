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

//! Axum extractor that resolves the signed-in user from the session cookie.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::session::{self, SESSION_COOKIE};
use crate::state::AppState;
use crate::users::LocalUser;

/// Extractor for the user behind a valid session.
///
/// The session JWT is read from the `session` cookie, verified, and its
/// subject re-resolved through the authenticator chain so that deleted
/// accounts lose access immediately.
///
/// Usage in a handler:
/// ```ignore
/// async fn my_handler(AuthUser(user): AuthUser) { ... }
/// ```
#[derive(Debug)]
pub struct AuthUser(pub LocalUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token =
            session::read_cookie(&parts.headers, SESSION_COOKIE).ok_or_else(AppError::unauthorized)?;
        let claims = session::decode_session_token(&state.session_secret, token)?;
        let user_id: i64 = claims.sub.parse().map_err(|_| AppError::unauthorized())?;

        state
            .authenticators
            .get_user(user_id)
            .await
            .map(AuthUser)
            .ok_or_else(AppError::unauthorized)
    }
}
