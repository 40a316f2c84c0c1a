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

//! Shared application state passed to every Axum handler via `State`.

use std::sync::Arc;

use crate::backend::{AuthenticatorChain, UaaBackend};
use crate::config::{Config, UaaConfig};
use crate::uaa::UaaTokenClient;
use crate::users::UserStore;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Identity provider settings.
    pub uaa: Arc<UaaConfig>,
    /// Backends tried, in order, for every login and session lookup.
    pub authenticators: AuthenticatorChain,
    /// Session cookie signing secret.
    pub session_secret: String,
    /// Cookie domain (e.g. ".example.com"), or `None` for default.
    pub cookie_domain: Option<String>,
    /// Whether cookies carry `Secure` and absolute URIs use `https`.
    pub cookie_secure: bool,
}

impl AppState {
    /// State with a single [`UaaBackend`] over `users`.
    pub fn new(config: &Config, users: Arc<dyn UserStore>) -> Result<Self, reqwest::Error> {
        let uaa = Arc::new(config.uaa.clone());
        let exchange = Arc::new(UaaTokenClient::new(uaa.clone())?);
        let backend = UaaBackend::new(exchange, users, uaa.token_trust.clone());
        let authenticators = AuthenticatorChain::new().with(Arc::new(backend));
        Ok(Self {
            uaa,
            ..Self::with_authenticators(config, authenticators)
        })
    }

    /// State with a caller-assembled backend chain.
    pub fn with_authenticators(config: &Config, authenticators: AuthenticatorChain) -> Self {
        Self {
            uaa: Arc::new(config.uaa.clone()),
            authenticators,
            session_secret: config.session_secret.clone(),
            cookie_domain: config.cookie_domain.clone(),
            cookie_secure: config.cookie_secure,
        }
    }
}
