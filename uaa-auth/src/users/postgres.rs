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

//! PostgreSQL user store.
//!
//! Reads the host application's `users` table:
//!
//! ```sql
//! CREATE TABLE users (
//!     id       BIGSERIAL PRIMARY KEY,
//!     username TEXT NOT NULL,
//!     email    TEXT NOT NULL
//! );
//! ```
//!
//! Case folding happens in SQL on both sides of the comparison, so the
//! database's `LOWER` is the only folding rule in play. Nothing enforces
//! unique emails under case folding, so lookups order by id. Under
//! concurrent inserts the winner of a collision is whichever row
//! committed with the lower id.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{LocalUser, UserStore, UserStoreError};

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email_ignoring_case(
        &self,
        email: &str,
    ) -> Result<Option<LocalUser>, UserStoreError> {
        let user = sqlx::query_as::<_, LocalUser>(
            "SELECT id, username, email FROM users \
             WHERE LOWER(email) = LOWER($1) ORDER BY id LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<LocalUser>, UserStoreError> {
        let user =
            sqlx::query_as::<_, LocalUser>("SELECT id, username, email FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }
}
