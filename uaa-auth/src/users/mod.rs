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

//! Local user records and their lookup.
//!
//! The user table belongs to the host application. This crate only reads
//! it: an identity from the provider is matched to an existing account by
//! case-insensitive email, and nothing is ever created here.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

/// The host application's user account.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct LocalUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Storage failures while looking users up.
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("user store query failed: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read access to local user accounts.
///
/// Implementations must be safe under concurrent reads.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find the user whose email equals `email` ignoring case.
    ///
    /// Both sides are case-folded by the store itself, so the comparison
    /// uses a single folding rule. When several accounts collide under case
    /// folding, the one that comes first in store order (lowest id) is
    /// returned.
    async fn find_by_email_ignoring_case(
        &self,
        email: &str,
    ) -> Result<Option<LocalUser>, UserStoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<LocalUser>, UserStoreError>;
}

/// Case-fold an email address for comparison.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

/// Resolve an email address to a local user, ignoring case.
///
/// Storage failures are logged and treated as "no such user".
pub async fn get_user_by_email(store: &dyn UserStore, email: &str) -> Option<LocalUser> {
    match store.find_by_email_ignoring_case(email).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("User lookup by email failed: {e}");
            None
        }
    }
}

/// Resolve a local user id. Missing ids and storage failures yield `None`.
pub async fn get_user_by_id(store: &dyn UserStore, id: i64) -> Option<LocalUser> {
    match store.find_by_id(id).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("User lookup by id {id} failed: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_whole_address() {
        assert_eq!(normalize_email("Foo.Bar@Example.ORG"), "foo.bar@example.org");
    }

    #[test]
    fn normalize_keeps_whitespace() {
        assert_eq!(normalize_email(" A@b.org"), " a@b.org");
    }
}
