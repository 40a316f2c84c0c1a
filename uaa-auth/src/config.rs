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

//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Value of `UAA_AUTH_URL` / `UAA_TOKEN_URL` that selects the built-in
/// development provider, same as leaving the variable unset.
pub const FAKE_URL_SENTINEL: &str = "fake:";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the UAA authentication service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server (e.g. "0.0.0.0:8080").
    pub listen_addr: String,
    /// PostgreSQL connection string. `None` selects the in-memory user store.
    pub database_url: Option<String>,
    /// Emails loaded into the in-memory user store at start-up.
    pub seed_user_emails: Vec<String>,
    /// Secret used to sign session cookies (HMAC-SHA256).
    pub session_secret: String,
    /// Cookie domain (optional, e.g. ".example.com").
    pub cookie_domain: Option<String>,
    /// Mark cookies `Secure` and build `https` absolute URIs.
    pub cookie_secure: bool,
    pub uaa: UaaConfig,
}

/// How much the backend trusts the access token returned by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenTrust {
    /// Read the identity without checking the token signature. The token is
    /// trusted because it was just received from the configured token
    /// endpoint in response to our own authenticated request.
    Channel,
    /// Require a valid HS256 signature made with this shared secret.
    SharedSecret(String),
}

/// Identity provider settings, passed explicitly to everything that talks to UAA.
#[derive(Debug, Clone)]
pub struct UaaConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Authorize endpoint. `None` selects the development provider.
    pub auth_url: Option<String>,
    /// Token endpoint. `None` selects the development provider.
    pub token_url: Option<String>,
    /// Provider logout endpoint used by `/auth/logout`.
    pub logout_url: Option<String>,
    /// Upper bound for the whole token request.
    pub request_timeout: Duration,
    pub token_trust: TokenTrust,
    /// Development mode. Required for the fake provider.
    pub debug: bool,
}

impl UaaConfig {
    /// Settings for a real provider at the given endpoints.
    pub fn new(client_id: &str, client_secret: &str, auth_url: &str, token_url: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            auth_url: Some(auth_url.to_string()),
            token_url: Some(token_url.to_string()),
            logout_url: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token_trust: TokenTrust::Channel,
            debug: false,
        }
    }

    /// Development settings that use the built-in fake provider.
    pub fn fake(client_id: &str, client_secret: &str) -> Self {
        Self {
            auth_url: None,
            token_url: None,
            debug: true,
            ..Self::new(client_id, client_secret, "", "")
        }
    }

    /// Whether either endpoint falls back to the built-in development provider.
    pub fn uses_fake_provider(&self) -> bool {
        self.auth_url.is_none() || self.token_url.is_none()
    }
}

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
    #[error("UAA_AUTH_URL and UAA_TOKEN_URL must be set unless UAA_DEBUG is enabled")]
    FakeProviderOutsideDebug,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Required
    /// - `SESSION_SECRET`
    /// - `UAA_CLIENT_ID`, `UAA_CLIENT_SECRET`
    ///
    /// # Optional
    /// - `LISTEN_ADDR` (default: `"0.0.0.0:8080"`)
    /// - `DATABASE_URL`, `SEED_USER_EMAILS`
    /// - `COOKIE_DOMAIN`, `COOKIE_SECURE` (default: `true`)
    /// - `UAA_AUTH_URL`, `UAA_TOKEN_URL` (unset or `fake:` selects the
    ///   development provider, which also needs `UAA_DEBUG=true`)
    /// - `UAA_LOGOUT_URL`, `UAA_TIMEOUT_SECS` (default: `10`),
    ///   `UAA_TOKEN_SECRET`, `UAA_DEBUG`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let session_secret = require("SESSION_SECRET")?;
        let client_id = require("UAA_CLIENT_ID")?;
        let client_secret = require("UAA_CLIENT_SECRET")?;

        let endpoint = |key: &str| get(key).filter(|url| url != FAKE_URL_SENTINEL);
        let auth_url = endpoint("UAA_AUTH_URL");
        let token_url = endpoint("UAA_TOKEN_URL");

        let debug = parse_flag("UAA_DEBUG", get("UAA_DEBUG"), false)?;
        let cookie_secure = parse_flag("COOKIE_SECURE", get("COOKIE_SECURE"), true)?;

        let timeout_secs = match get("UAA_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    var: "UAA_TIMEOUT_SECS",
                    reason: format!("expected a positive number of seconds, got {raw:?}"),
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let token_trust = match get("UAA_TOKEN_SECRET") {
            Some(secret) => TokenTrust::SharedSecret(secret),
            None => TokenTrust::Channel,
        };

        let uaa = UaaConfig {
            client_id,
            client_secret,
            auth_url,
            token_url,
            logout_url: get("UAA_LOGOUT_URL"),
            request_timeout: Duration::from_secs(timeout_secs),
            token_trust,
            debug,
        };

        if uaa.uses_fake_provider() && !uaa.debug {
            return Err(ConfigError::FakeProviderOutsideDebug);
        }

        let seed_user_emails = get("SEED_USER_EMAILS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|email| !email.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            listen_addr: get("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            database_url: get("DATABASE_URL"),
            seed_user_emails,
            session_secret,
            cookie_domain: get("COOKIE_DOMAIN"),
            cookie_secure,
            uaa,
        })
    }
}

fn parse_flag(var: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            reason: format!("expected a boolean, got {raw:?}"),
        }),
    }
}
