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

//! Login, callback, profile and logout routes.


use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, StatusCode};
use test_helpers::*;
use tower::ServiceExt;
use uaa_auth::backend::{Authenticator, AuthenticatorChain};
use uaa_auth::config::UaaConfig;
use uaa_auth::request::RequestContext;
use uaa_auth::users::LocalUser;
use uaa_auth_types::responses::{APIResponse, ProfileResponse};
use uaa_auth_types::APIError;

/// Accepts the single code `good`, optionally setting a session expiry.
struct StubAuthenticator {
    user: LocalUser,
    expires_in: Option<u64>,
}

#[async_trait]
impl Authenticator for StubAuthenticator {
    async fn authenticate(
        &self,
        code: Option<&str>,
        request: Option<&mut dyn RequestContext>,
    ) -> Option<LocalUser> {
        let request = request?;
        if code != Some("good") {
            return None;
        }
        if let Some(seconds) = self.expires_in {
            request.set_session_expiry(seconds);
        }
        Some(self.user.clone())
    }

    async fn get_user(&self, user_id: i64) -> Option<LocalUser> {
        (user_id == self.user.id).then(|| self.user.clone())
    }
}

fn alice() -> LocalUser {
    LocalUser {
        id: 7,
        username: "alice".to_string(),
        email: "alice@example.org".to_string(),
    }
}

fn stub_app(expires_in: Option<u64>) -> axum::Router {
    let chain = AuthenticatorChain::new().with(Arc::new(StubAuthenticator {
        user: alice(),
        expires_in,
    }));
    build_app_with_chain(&fake_config(), chain)
}

fn callback_request(query: &str, cookie: &str) -> axum::http::Request<Body> {
    request("GET", &format!("/auth/callback?{query}"))
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn login_redirects_to_authorize_url_with_state() {
    let app = stub_app(None);

    let resp = app
        .oneshot(
            request("GET", "/auth/login?next=%2Fdashboard")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let state = set_cookie_value(resp.headers(), "uaa_state").expect("state cookie");
    assert!(!state.is_empty());
    assert_eq!(
        set_cookie_value(resp.headers(), "uaa_next").as_deref(),
        Some("/dashboard")
    );
    let state_cookie = set_cookie_header(resp.headers(), "uaa_state").unwrap();
    assert!(state_cookie.contains("HttpOnly"));
    assert!(state_cookie.contains("Max-Age=600"));

    let target = url::Url::parse(&location(resp.headers())).expect("absolute authorize URL");
    assert_eq!(target.as_str().split('?').next(), Some("http://testserver/fake/oauth/authorize"));
    let params: std::collections::HashMap<_, _> = target.query_pairs().into_owned().collect();
    assert_eq!(params["client_id"], CLIENT_ID);
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["redirect_uri"], "http://testserver/auth/callback");
    assert_eq!(params["state"], state);
}

#[tokio::test]
async fn login_ignores_offsite_next() {
    let app = stub_app(None);

    let resp = app
        .oneshot(
            request("GET", "/auth/login?next=%2F%2Fevil.example%2F")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(set_cookie_value(resp.headers(), "uaa_next").as_deref(), Some(""));
}

#[tokio::test]
async fn login_uses_configured_authorize_url() {
    let config = test_config(UaaConfig::new(
        CLIENT_ID,
        CLIENT_SECRET,
        "https://uaa.example.org/oauth/authorize",
        "https://uaa.example.org/oauth/token",
    ));
    let app = build_app(&config, seeded_store(&[]).await);

    let resp = app
        .oneshot(request("GET", "/auth/login").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(location(resp.headers()).starts_with("https://uaa.example.org/oauth/authorize?client_id=clientid"));
}

#[tokio::test]
async fn callback_rejects_missing_state_cookie() {
    let app = stub_app(None);

    let resp = app
        .oneshot(
            request("GET", "/auth/callback?code=good&state=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: APIResponse<APIError> = response_json(resp).await;
    assert!(!body.success);
    assert_eq!(body.result.code, "INVALID_STATE");
}

#[tokio::test]
async fn callback_rejects_mismatched_state() {
    let app = stub_app(None);

    let resp = app
        .oneshot(callback_request("code=good&state=abc", "uaa_state=xyz"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: APIResponse<APIError> = response_json(resp).await;
    assert_eq!(body.result.code, "INVALID_STATE");
}

#[tokio::test]
async fn callback_rejects_unknown_code() {
    let app = stub_app(None);

    let resp = app
        .oneshot(callback_request("code=bad&state=abc", "uaa_state=abc"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie_header(resp.headers(), "session").is_none());
    let body: APIResponse<APIError> = response_json(resp).await;
    assert_eq!(body.result.code, "LOGIN_FAILED");
}

#[tokio::test]
async fn callback_without_code_is_a_bad_request() {
    let app = stub_app(None);

    let resp = app
        .oneshot(callback_request("state=abc", "uaa_state=abc"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: APIResponse<APIError> = response_json(resp).await;
    assert!(!body.success);
    assert_eq!(body.result.code, "BAD_REQUEST");
}

#[tokio::test]
async fn callback_with_empty_code_is_a_bad_request() {
    let app = stub_app(None);

    let resp = app
        .oneshot(callback_request("code=&state=abc", "uaa_state=abc"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: APIResponse<APIError> = response_json(resp).await;
    assert_eq!(body.result.code, "BAD_REQUEST");
}

#[tokio::test]
async fn callback_reports_provider_error() {
    let app = stub_app(None);

    let resp = app
        .oneshot(callback_request("error=access_denied&state=abc", "uaa_state=abc"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn callback_session_lifetime_follows_expires_in() {
    let app = stub_app(Some(15));

    let resp = app
        .oneshot(callback_request(
            "code=good&state=abc",
            "uaa_state=abc; uaa_next=/dashboard",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(resp.headers()), "/dashboard");
    let session = set_cookie_header(resp.headers(), "session").expect("session cookie");
    assert!(session.contains("Max-Age=15"), "{session}");
    assert_eq!(set_cookie_value(resp.headers(), "uaa_state").as_deref(), Some(""));
    assert_eq!(set_cookie_value(resp.headers(), "uaa_next").as_deref(), Some(""));
}

#[tokio::test]
async fn callback_without_expiry_uses_fallback_lifetime() {
    let app = stub_app(None);

    let resp = app
        .oneshot(callback_request("code=good&state=abc", "uaa_state=abc"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(resp.headers()), "/");
    let session = set_cookie_header(resp.headers(), "session").expect("session cookie");
    assert!(session.contains("Max-Age=3600"), "{session}");
}

#[tokio::test]
async fn profile_requires_session() {
    let app = stub_app(None);

    let resp = app
        .oneshot(request("GET", "/auth/profile").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: APIResponse<APIError> = response_json(resp).await;
    assert_eq!(body.result.code, "UNAUTHORIZED");
}

#[tokio::test]
async fn profile_returns_session_user() {
    let app = stub_app(None);

    let resp = app
        .oneshot(
            request("GET", "/auth/profile")
                .header(header::COOKIE, session_cookie(&alice()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: APIResponse<ProfileResponse> = response_json(resp).await;
    assert!(body.success);
    assert_eq!(
        body.result,
        ProfileResponse {
            id: 7,
            username: "alice".to_string(),
            email: "alice@example.org".to_string(),
        }
    );
}

#[tokio::test]
async fn profile_rejects_session_of_vanished_user() {
    let app = stub_app(None);
    let ghost = LocalUser {
        id: 99,
        ..alice()
    };

    let resp = app
        .oneshot(
            request("GET", "/auth/profile")
                .header(header::COOKIE, session_cookie(&ghost))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_session_and_returns_home() {
    let app = stub_app(None);

    let resp = app
        .oneshot(
            request("GET", "/auth/logout")
                .header(header::COOKIE, session_cookie(&alice()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(resp.headers()), "/");
    let cleared = set_cookie_header(resp.headers(), "session").expect("session cookie");
    assert!(cleared.starts_with("session=;"));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn logout_redirects_through_provider_when_configured() {
    let mut config = fake_config();
    config.uaa.logout_url = Some("https://uaa.example.org/logout.do".to_string());
    let app = build_app(&config, seeded_store(&[]).await);

    let resp = app
        .oneshot(request("GET", "/auth/logout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(
        location(resp.headers()),
        "https://uaa.example.org/logout.do?redirect=http%3A%2F%2Ftestserver%2F"
    );
}

/// Full browser round trip through the fake provider on a real socket, so
/// the token exchange goes over HTTP.
#[tokio::test]
async fn full_login_through_fake_provider() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = build_app(&fake_config(), seeded_store(&["Boop@gsa.gov"]).await);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });

    let base = format!("http://{addr}");
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let resp = client
        .get(format!("{base}/auth/login?next=/dashboard"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 303);
    let state = set_cookie_value(resp.headers(), "uaa_state").expect("state cookie");
    let authorize = location(resp.headers());
    assert!(authorize.starts_with(&format!("{base}/fake/oauth/authorize?")));

    let resp = client
        .get(format!("{authorize}&email=BOOP%40gsa.gov"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 302);
    let callback = location(resp.headers());
    assert!(callback.starts_with(&format!("{base}/auth/callback?code=BOOP%40gsa.gov")));

    let resp = client
        .get(&callback)
        .header(header::COOKIE, format!("uaa_state={state}; uaa_next=/dashboard"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 303);
    assert_eq!(location(resp.headers()), "/dashboard");
    let session_cookie = set_cookie_header(resp.headers(), "session").expect("session cookie");
    assert!(session_cookie.contains("Max-Age=600"), "{session_cookie}");
    let session = set_cookie_value(resp.headers(), "session").unwrap();

    let resp = client
        .get(format!("{base}/auth/profile"))
        .header(header::COOKIE, format!("session={session}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: APIResponse<ProfileResponse> = resp.json().await.unwrap();
    assert_eq!(body.result.email, "Boop@gsa.gov");
    assert_eq!(body.result.username, "Boop");
}
