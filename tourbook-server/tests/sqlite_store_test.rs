//! SQLite document store tests

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::AUTHORIZATION;
use axum_test::TestServer;
use common::{bearer, TEST_SECRET};
use serde_json::{json, Value};
use tempfile::TempDir;
use tourbook_core::TokenService;
use tourbook_server::store::{Collection, Document, Filter, Update};
use tourbook_server::{routes, AppState, DocumentStore, ServerError, SqliteStore, StoreHandle};

fn doc(value: Value) -> Document {
    value.as_object().cloned().unwrap()
}

fn temp_db() -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tourbook.db").to_string_lossy().into_owned();
    (dir, path)
}

/// Test: documents survive closing and reopening the database
#[test]
fn test_documents_persist_across_reopen() {
    let (_dir, path) = temp_db();

    let id = {
        let store = SqliteStore::open(&path).unwrap();
        store
            .insert_one(Collection::Users, doc(json!({ "email": "keep@example.com" })))
            .unwrap()
    };

    let store = SqliteStore::open(&path).unwrap();
    let found = store
        .find_one(Collection::Users, &Filter::by_id(&id))
        .unwrap()
        .unwrap();
    assert_eq!(found["email"], "keep@example.com");
    assert_eq!(found["_id"], id.as_str());
}

/// Test: collections are kept apart and filters combine
#[test]
fn test_filters_and_collections() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .insert_one(Collection::Bookings, doc(json!({ "guideEmail": "g@x.com", "status": "In Review" })))
        .unwrap();
    store
        .insert_one(Collection::Bookings, doc(json!({ "guideEmail": "g@x.com", "status": "Accepted" })))
        .unwrap();
    store
        .insert_one(Collection::Wishlists, doc(json!({ "guideEmail": "g@x.com" })))
        .unwrap();

    let guide = Filter::eq("guideEmail", "g@x.com");
    assert_eq!(store.count(Collection::Bookings, &guide).unwrap(), 2);
    assert_eq!(store.count(Collection::Bookings, &Filter::all()).unwrap(), 2);

    let accepted = store
        .find(Collection::Bookings, &guide.and("status", "Accepted"))
        .unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0]["status"], "Accepted");
}

/// Test: update touches the first match and reports counts
#[test]
fn test_update_and_delete() {
    let store = SqliteStore::open_in_memory().unwrap();
    let id = store
        .insert_one(Collection::Users, doc(json!({ "email": "u@x.com", "requestedRole": true })))
        .unwrap();

    let result = store
        .update_one(
            Collection::Users,
            &Filter::by_id(&id),
            &Update::set("role", "guide").and_set("requestedRole", false),
        )
        .unwrap();
    assert_eq!(result.matched_count, 1);
    assert_eq!(result.modified_count, 1);

    // same values again: matched but unchanged
    let result = store
        .update_one(Collection::Users, &Filter::by_id(&id), &Update::set("role", "guide"))
        .unwrap();
    assert_eq!(result.matched_count, 1);
    assert_eq!(result.modified_count, 0);

    let result = store
        .update_one(Collection::Users, &Filter::by_id("missing"), &Update::set("role", "admin"))
        .unwrap();
    assert_eq!(result.matched_count, 0);

    let user = store
        .find_one(Collection::Users, &Filter::eq("email", "u@x.com"))
        .unwrap()
        .unwrap();
    assert_eq!(user["role"], "guide");
    assert_eq!(user["requestedRole"], false);

    assert_eq!(store.delete_one(Collection::Users, &Filter::by_id(&id)).unwrap(), 1);
    assert_eq!(store.delete_one(Collection::Users, &Filter::by_id(&id)).unwrap(), 0);
}

/// Test: a duplicate id in one collection is refused
#[test]
fn test_duplicate_id_rejected() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .insert_one(Collection::Packages, doc(json!({ "_id": "p1", "tour_type": "Sea" })))
        .unwrap();

    let err = store
        .insert_one(Collection::Packages, doc(json!({ "_id": "p1", "tour_type": "Hill" })))
        .unwrap_err();
    assert!(matches!(err, ServerError::Validation(_)));

    // the same id is fine in another collection
    store
        .insert_one(Collection::TourTypes, doc(json!({ "_id": "p1" })))
        .unwrap();
}

/// Test: the full grant flow works over a SQLite file
#[tokio::test]
async fn test_server_over_sqlite() {
    let (_dir, path) = temp_db();
    let store = StoreHandle::new(SqliteStore::open(&path).unwrap(), Duration::from_secs(2));
    let tokens = TokenService::new(TEST_SECRET).unwrap();
    let state = Arc::new(AppState::new(tokens, store));
    let server = TestServer::new(routes::create_router(state.clone())).unwrap();

    state
        .store
        .insert_one(Collection::Users, &json!({ "email": "admin@example.com", "role": "admin" }))
        .await
        .unwrap();
    let admin = state.tokens.issue(&json!({ "email": "admin@example.com" })).unwrap();

    let response = server
        .post("/users")
        .json(&json!({ "email": "guide@example.com" }))
        .await;
    let body: Value = response.json();
    let guide_id = body["insertedId"].as_str().unwrap().to_string();

    let response = server
        .patch(&format!("/users/guide/{}", guide_id))
        .add_header(AUTHORIZATION, bearer(&admin))
        .await;
    assert_eq!(response.status_code(), 200);

    let reopened = SqliteStore::open(&path).unwrap();
    let guide = reopened
        .find_one(Collection::Users, &Filter::by_id(&guide_id))
        .unwrap()
        .unwrap();
    assert_eq!(guide["role"], "guide");
}
