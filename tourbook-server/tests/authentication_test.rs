//! Token issuance and authentication guard tests

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderValue;
use chrono::{Duration, Utc};
use common::{bearer, create_test_server, create_user, token_for};
use serde_json::{json, Value};

/// Test: POST /jwt returns a token that opens protected routes
#[tokio::test]
async fn test_issued_token_authenticates() {
    let (server, _) = create_test_server();
    create_user(&server, "traveller@example.com").await;

    let response = server
        .post("/jwt")
        .json(&json!({ "email": "traveller@example.com", "name": "Traveller" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let token = body["token"].as_str().unwrap().to_string();

    let response = server
        .get("/users/admin/traveller@example.com")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["admin"], false);
}

/// Test: an audience in the sign-in payload still yields a usable token
#[tokio::test]
async fn test_token_with_client_audience_authenticates() {
    let (server, _) = create_test_server();

    let response = server
        .post("/jwt")
        .json(&json!({ "email": "t@example.com", "aud": "web", "nbf": 4102444800i64 }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let token = body["token"].as_str().unwrap().to_string();

    let response = server
        .get("/users/guide/t@example.com")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["guide"], false);
}

/// Test: POST /jwt without an email is a bad request
#[tokio::test]
async fn test_issue_without_email_rejected() {
    let (server, _) = create_test_server();

    let response = server.post("/jwt").json(&json!({ "name": "Nobody" })).await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "validation");
}

/// Test: missing Authorization header is 401 "no token provided"
#[tokio::test]
async fn test_missing_token_unauthorized() {
    let (server, _) = create_test_server();

    let response = server.get("/users/admin/someone@example.com").await;
    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(body["message"], "no token provided");
}

/// Test: a header that is present but not a bearer token is an invalid token
#[tokio::test]
async fn test_malformed_authorization_header_forbidden() {
    let (server, _) = create_test_server();

    for value in ["Bearer ", "Basic dXNlcjpwYXNz", "justatoken"] {
        let response = server
            .get("/users/admin/someone@example.com")
            .add_header(AUTHORIZATION, HeaderValue::from_static(value))
            .await;
        assert_eq!(response.status_code(), 403, "header {:?}", value);
        let body: Value = response.json();
        assert_eq!(body["error"], "invalid_token");
        assert_eq!(body["message"], "invalid token");
    }
}

/// Test: garbage token is 403 "invalid token"
#[tokio::test]
async fn test_invalid_token_forbidden() {
    let (server, _) = create_test_server();

    let response = server
        .get("/users/admin/someone@example.com")
        .add_header(AUTHORIZATION, bearer("not.a.token"))
        .await;
    assert_eq!(response.status_code(), 403);
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid_token");
    assert_eq!(body["message"], "invalid token");
}

/// Test: expired token is rejected, never treated as valid
#[tokio::test]
async fn test_expired_token_forbidden() {
    let (server, state) = create_test_server();
    create_user(&server, "late@example.com").await;

    let issued_at = Utc::now() - Duration::hours(2);
    let token = state
        .tokens
        .issue_at(&json!({ "email": "late@example.com" }), issued_at)
        .unwrap();

    let response = server
        .get("/users/admin/late@example.com")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(response.status_code(), 403);
}

/// Test: token signed with another secret is rejected
#[tokio::test]
async fn test_foreign_token_forbidden() {
    let (server, _) = create_test_server();
    let foreign = tourbook_core::TokenService::new("someone-elses-secret").unwrap();
    let token = foreign.issue(&json!({ "email": "x@example.com" })).unwrap();

    let response = server
        .get("/users/admin/x@example.com")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(response.status_code(), 403);
}

/// Test: public routes need no token
#[tokio::test]
async fn test_public_routes_open() {
    let (server, _) = create_test_server();

    assert_eq!(server.get("/").await.status_code(), 200);
    assert_eq!(server.get("/packages").await.status_code(), 200);
    assert_eq!(server.get("/tourGuides").await.status_code(), 200);
    assert_eq!(server.get("/tourType").await.status_code(), 200);
    assert_eq!(server.get("/stories").await.status_code(), 200);
}

/// Test: role check for another user's email is forbidden
#[tokio::test]
async fn test_role_check_only_for_self() {
    let (server, state) = create_test_server();
    create_user(&server, "me@example.com").await;
    let token = token_for(&state, "me@example.com");

    let response = server
        .get("/users/guide/someone-else@example.com")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(response.status_code(), 403);
    let body: Value = response.json();
    assert_eq!(body["error"], "forbidden");
}

/// Test: role check for an unregistered caller is false, not an error
#[tokio::test]
async fn test_role_check_unknown_user_false() {
    let (server, state) = create_test_server();
    let token = token_for(&state, "ghost@example.com");

    let response = server
        .get("/users/guide/ghost@example.com")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["guide"], false);
}
