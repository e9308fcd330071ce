//! Router + token helpers for the HTTP-level tests.
//!
//! The app is built exactly as `app::run` builds it, except the drinks live in
//! memory and the signing keys come from `tests/fixtures` instead of a JWKS endpoint.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use jsonwebtoken::jwk::JwkSet;
use serde_json::Value;
use tower::ServiceExt;

use coffee_shop::app::build_router;
use coffee_shop::config::Config;
use coffee_shop::repos::MemoryDrinkRepo;
use coffee_shop::services::auth::keys::LocalKeyProvider;
use coffee_shop::services::auth::{Audience, Claims, TokenVerifier};
use coffee_shop::state::AppState;

mod tokens;

pub use tokens::*;

pub const BARISTA: &[&str] = &["get:drinks-detail"];
pub const MANAGER: &[&str] = &[
    "get:drinks-detail",
    "post:drinks",
    "patch:drinks",
    "delete:drinks",
];

pub fn config() -> Config {
    Config::from_vars(|key| match key {
        "AUTH0_DOMAIN" => Some(DOMAIN.to_string()),
        "API_AUDIENCE" => Some(AUDIENCE.to_string()),
        _ => None,
    })
    .expect("test config")
}

pub fn app() -> Router {
    let config = config();
    let jwks: JwkSet = serde_json::from_str(JWKS_JSON).expect("jwks fixture");
    let keys = Arc::new(LocalKeyProvider::from_jwk_set(&jwks));
    let verifier = Arc::new(TokenVerifier::new(&config.auth, keys));
    let state = AppState::new(Arc::new(MemoryDrinkRepo::new()), verifier);

    build_router(state, &config)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    into_test_response(app.clone().oneshot(request).await.expect("response")).await
}

pub async fn send_raw(app: &Router, request: Request<Body>) -> TestResponse {
    into_test_response(app.clone().oneshot(request).await.expect("response")).await
}

async fn into_test_response(response: axum::response::Response) -> TestResponse {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    TestResponse {
        status,
        headers,
        body,
    }
}
