//! Common test utilities for server integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum_test::TestServer;
use serde_json::{json, Value};
use tourbook_core::TokenService;
use tourbook_server::store::Collection;
use tourbook_server::{routes, AppState, InMemoryStore, StoreHandle};

pub const TEST_SECRET: &str = "integration-test-secret";

pub type TestState = Arc<AppState<InMemoryStore>>;

/// Create a test server over an empty in-memory store
pub fn create_test_server() -> (TestServer, TestState) {
    let tokens = TokenService::new(TEST_SECRET).expect("token service");
    let store = StoreHandle::new(InMemoryStore::new(), Duration::from_secs(2));
    let state = Arc::new(AppState::new(tokens, store));

    let app = routes::create_router(state.clone());
    let server = TestServer::new(app).expect("Failed to create test server");

    (server, state)
}

/// Mint a token directly, as `POST /jwt` would
pub fn token_for(state: &TestState, email: &str) -> String {
    state
        .tokens
        .issue(&json!({ "email": email }))
        .expect("issue token")
}

/// `Authorization` header value for a token
pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).expect("header value")
}

/// Register a user through the API and return their id
pub async fn create_user(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/users")
        .json(&json!({ "email": email, "name": email }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    body["insertedId"]
        .as_str()
        .expect("user should be new")
        .to_string()
}

/// Insert a user that already holds a role, bypassing the grant flow
pub async fn seed_user_with_role(state: &TestState, email: &str, role: &str) -> String {
    state
        .store
        .insert_one(Collection::Users, &json!({ "email": email, "role": role }))
        .await
        .expect("seed user")
}

/// Create an admin and return a token for them
pub async fn admin_token(state: &TestState) -> String {
    seed_user_with_role(state, "admin@example.com", "admin").await;
    token_for(state, "admin@example.com")
}
