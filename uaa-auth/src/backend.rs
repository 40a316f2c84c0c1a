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

//! Authentication backends.
//!
//! An [`Authenticator`] turns request credentials into a local user, or
//! `None`. Backends never error: every failure on the way (no code, failed
//! exchange, bad token, unknown user) is "not authenticated by me", which
//! lets an [`AuthenticatorChain`] try the next backend.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::TokenTrust;
use crate::request::RequestContext;
use crate::uaa::{decode_identity_claims, TokenExchange};
use crate::users::{self, LocalUser, UserStore};

/// A pluggable authentication backend.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticate with an authorization `code` received on `request`.
    ///
    /// Called without credentials it returns `None` without side effects.
    async fn authenticate(
        &self,
        code: Option<&str>,
        request: Option<&mut dyn RequestContext>,
    ) -> Option<LocalUser>;

    /// Look up a previously authenticated user by local id.
    async fn get_user(&self, user_id: i64) -> Option<LocalUser>;
}

/// Authenticates UAA authorization codes against local accounts.
pub struct UaaBackend {
    exchange: Arc<dyn TokenExchange>,
    users: Arc<dyn UserStore>,
    token_trust: TokenTrust,
}

impl UaaBackend {
    pub fn new(
        exchange: Arc<dyn TokenExchange>,
        users: Arc<dyn UserStore>,
        token_trust: TokenTrust,
    ) -> Self {
        Self {
            exchange,
            users,
            token_trust,
        }
    }

    /// Resolve an email to a local user, ignoring case.
    pub async fn get_user_by_email(&self, email: &str) -> Option<LocalUser> {
        users::get_user_by_email(self.users.as_ref(), email).await
    }
}

#[async_trait]
impl Authenticator for UaaBackend {
    async fn authenticate(
        &self,
        code: Option<&str>,
        request: Option<&mut dyn RequestContext>,
    ) -> Option<LocalUser> {
        let (code, request) = match (code, request) {
            (Some(code), Some(request)) if !code.is_empty() => (code, request),
            _ => return None,
        };

        let access_token = self
            .exchange
            .exchange_code_for_access_token(request, code)
            .await?;

        let claims = match decode_identity_claims(&access_token, &self.token_trust) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Discarding access token: {e}");
                return None;
            }
        };

        self.get_user_by_email(&claims.email).await
    }

    async fn get_user(&self, user_id: i64) -> Option<LocalUser> {
        users::get_user_by_id(self.users.as_ref(), user_id).await
    }
}

/// Ordered list of backends; the first one that recognises the credentials wins.
#[derive(Clone, Default)]
pub struct AuthenticatorChain {
    backends: Vec<Arc<dyn Authenticator>>,
}

impl AuthenticatorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a backend, tried after every backend already in the chain.
    pub fn with(mut self, backend: Arc<dyn Authenticator>) -> Self {
        self.backends.push(backend);
        self
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub async fn authenticate(
        &self,
        code: Option<&str>,
        mut request: Option<&mut dyn RequestContext>,
    ) -> Option<LocalUser> {
        for backend in &self.backends {
            let user = match request.as_mut() {
                Some(request) => backend.authenticate(code, Some(&mut **request)).await,
                None => backend.authenticate(code, None).await,
            };
            if user.is_some() {
                return user;
            }
        }
        None
    }

    pub async fn get_user(&self, user_id: i64) -> Option<LocalUser> {
        for backend in &self.backends {
            if let Some(user) = backend.get_user(user_id).await {
                return Some(user);
            }
        }
        None
    }
}
