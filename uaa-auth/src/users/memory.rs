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

//! In-memory user store for development and tests.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{normalize_email, LocalUser, UserStore, UserStoreError};

/// Users kept in insertion order with sequential ids starting at 1.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<LocalUser>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding one user per email; usernames are the local part.
    pub async fn with_emails<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let store = Self::new();
        for email in emails {
            let email = email.as_ref();
            let username = email.split('@').next().unwrap_or(email);
            store.insert(username, email).await;
        }
        store
    }

    /// Add a user, storing the email exactly as given.
    pub async fn insert(&self, username: &str, email: &str) -> LocalUser {
        let mut users = self.users.write().await;
        let id = users.last().map_or(1, |last| last.id + 1);
        let user = LocalUser {
            id,
            username: username.to_string(),
            email: email.to_string(),
        };
        users.push(user.clone());
        user
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email_ignoring_case(
        &self,
        email: &str,
    ) -> Result<Option<LocalUser>, UserStoreError> {
        let wanted = normalize_email(email);
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|user| normalize_email(&user.email) == wanted)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<LocalUser>, UserStoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.id == id).cloned())
    }
}
