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

//! Axum router configuration.

pub mod fake;
pub mod login;

use axum::{
    routing::{get, post},
    Router,
};

use crate::config::UaaConfig;
use crate::state::AppState;
use crate::uaa::{CALLBACK_PATH, FAKE_AUTH_PATH, FAKE_TOKEN_PATH};

/// Build the application router.
///
/// The development provider is only mounted when one of the UAA endpoints
/// falls back to it.
pub fn router(uaa: &UaaConfig) -> Router<AppState> {
    let router = Router::new()
        .route("/auth/login", get(login::login))
        .route(CALLBACK_PATH, get(login::callback))
        .route("/auth/logout", get(login::logout))
        .route("/auth/profile", get(login::profile));

    if uaa.uses_fake_provider() {
        router
            .route(FAKE_AUTH_PATH, get(fake::authorize))
            .route(FAKE_TOKEN_PATH, post(fake::token))
    } else {
        router
    }
}
