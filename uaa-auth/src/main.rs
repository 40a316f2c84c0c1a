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

//! UAA authentication server entry point.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use uaa_auth::config::{Config, TokenTrust};
use uaa_auth::routes;
use uaa_auth::state::AppState;
use uaa_auth::users::{MemoryUserStore, PgUserStore, UserStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().expect("failed to load configuration");

    let users: Arc<dyn UserStore> = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(20)
                .connect(database_url)
                .await
                .expect("failed to connect to PostgreSQL");
            tracing::info!("Connected to PostgreSQL");
            Arc::new(PgUserStore::new(pool))
        }
        None => {
            let store = MemoryUserStore::with_emails(config.seed_user_emails.clone()).await;
            tracing::warn!(
                "DATABASE_URL not set, using in-memory user store with {} users",
                store.len().await
            );
            Arc::new(store)
        }
    };

    if config.uaa.uses_fake_provider() {
        tracing::warn!("Using the fake UAA provider, do not run this in production");
    }
    if config.uaa.token_trust == TokenTrust::Channel {
        tracing::info!("Access token signatures are not verified (UAA_TOKEN_SECRET not set)");
    }

    let state = AppState::new(&config, users).expect("failed to build HTTP client");
    let app = routes::router(&config.uaa)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind listener");

    tracing::info!("UAA auth service listening on {}", config.listen_addr);

    axum::serve(listener, app).await.expect("server error");
}
