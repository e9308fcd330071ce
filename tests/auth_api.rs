//! Authorization behaviour as seen over HTTP: status codes, error codes and messages.
mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::Utc;
use serde_json::json;

use coffee_shop::services::auth::Audience;
use common::{
    AUDIENCE, BARISTA, KID, MANAGER, ROGUE_KEY_PEM, ROGUE_KID, SIGNING_KEY_PEM, app, claims, send,
    send_raw, sign_with, token,
};

fn assert_auth_error(res: &common::TestResponse, status: StatusCode, code: &str, message: &str) {
    assert_eq!(res.status, status, "body: {}", res.body);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.body["error"], status.as_u16());
    assert_eq!(res.body["code"], code);
    assert_eq!(res.body["message"], message);
}

#[tokio::test]
async fn public_menu_needs_no_token() {
    let app = app();
    let res = send(&app, Method::GET, "/drinks", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({"success": true, "drinks": []}));
}

#[tokio::test]
async fn missing_header_is_401() {
    let app = app();
    let res = send(&app, Method::GET, "/drinks-detail", None, None).await;
    assert_auth_error(
        &res,
        StatusCode::UNAUTHORIZED,
        "invalid_header",
        "Authorization header is expected",
    );
}

#[tokio::test]
async fn non_bearer_scheme_is_401() {
    let app = app();
    let req = Request::builder()
        .uri("/drinks-detail")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())
        .unwrap();
    let res = send_raw(&app, req).await;
    assert_auth_error(
        &res,
        StatusCode::UNAUTHORIZED,
        "invalid_header",
        "Authorization header must be bearer token",
    );
}

#[tokio::test]
async fn garbage_token_is_401() {
    let app = app();
    let res = send(&app, Method::GET, "/drinks-detail", Some("not-a-jwt"), None).await;
    assert_auth_error(
        &res,
        StatusCode::UNAUTHORIZED,
        "invalid_header",
        "Unable to parse authentication token",
    );
}

#[tokio::test]
async fn granted_permission_reaches_the_handler() {
    let app = app();
    let res = send(&app, Method::GET, "/drinks-detail", Some(&token(BARISTA)), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
}

#[tokio::test]
async fn missing_permission_is_403() {
    let app = app();
    let res = send(
        &app,
        Method::POST,
        "/drinks",
        Some(&token(BARISTA)),
        Some(json!({"title": "Latte", "recipe": {"name": "milk", "color": "white", "parts": 1}})),
    )
    .await;
    assert_auth_error(
        &res,
        StatusCode::FORBIDDEN,
        "unauthorized",
        "Permission not found.",
    );

    // nothing was written
    let menu = send(&app, Method::GET, "/drinks", None, None).await;
    assert_eq!(menu.body["drinks"], json!([]));
}

#[tokio::test]
async fn token_without_permissions_claim_is_400() {
    let app = app();
    let bare = sign_with(&claims(None), Some(KID), SIGNING_KEY_PEM);
    let res = send(&app, Method::GET, "/drinks-detail", Some(&bare), None).await;
    assert_auth_error(
        &res,
        StatusCode::BAD_REQUEST,
        "invalid_claims",
        "Permissions not included in JWT.",
    );
}

#[tokio::test]
async fn expired_token_is_401() {
    let app = app();
    let mut expired = claims(Some(MANAGER));
    expired.exp = Utc::now().timestamp() - 60;
    let res = send(
        &app,
        Method::GET,
        "/drinks-detail",
        Some(&sign_with(&expired, Some(KID), SIGNING_KEY_PEM)),
        None,
    )
    .await;
    assert_auth_error(&res, StatusCode::UNAUTHORIZED, "token_expired", "Token expired");
}

#[tokio::test]
async fn wrong_audience_is_401() {
    let app = app();
    let mut other = claims(Some(MANAGER));
    other.aud = Audience::Single(format!("{AUDIENCE}-staging"));
    let res = send(
        &app,
        Method::GET,
        "/drinks-detail",
        Some(&sign_with(&other, Some(KID), SIGNING_KEY_PEM)),
        None,
    )
    .await;
    assert_auth_error(
        &res,
        StatusCode::UNAUTHORIZED,
        "invalid_claims",
        "Incorrect claims. Please, check the audience and issuer.",
    );
}

#[tokio::test]
async fn unknown_signing_key_is_400() {
    let app = app();
    let forged = sign_with(&claims(Some(MANAGER)), Some(ROGUE_KID), ROGUE_KEY_PEM);
    let res = send(&app, Method::GET, "/drinks-detail", Some(&forged), None).await;
    assert_auth_error(
        &res,
        StatusCode::BAD_REQUEST,
        "invalid_header",
        "Unable to find the appropriate key",
    );
}

#[tokio::test]
async fn known_kid_with_wrong_signature_is_400() {
    let app = app();
    let forged = sign_with(&claims(Some(MANAGER)), Some(KID), ROGUE_KEY_PEM);
    let res = send(&app, Method::GET, "/drinks-detail", Some(&forged), None).await;
    assert_auth_error(
        &res,
        StatusCode::BAD_REQUEST,
        "invalid_header",
        "Unable to parse authentication token",
    );
}

#[tokio::test]
async fn auth_runs_before_body_validation() {
    let app = app();
    let res = send(&app, Method::POST, "/drinks", None, Some(json!({}))).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["code"], "invalid_header");
}

#[tokio::test]
async fn cors_preflight_skips_authorization() {
    let app = app();
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/drinks-detail")
        .header(header::ORIGIN, "http://localhost:8100")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(Body::empty())
        .unwrap();
    let res = send_raw(&app, req).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
