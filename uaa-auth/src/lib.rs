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

//! UAA authentication backend library.
//!
//! Exchanges an OAuth2 authorization code with a UAA identity provider,
//! reads the email out of the returned access token and resolves it to a
//! local user. The binary entry point (`main.rs`) wires the pieces into an
//! Axum service.

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod request;
pub mod routes;
pub mod session;
pub mod state;
pub mod uaa;
pub mod users;
