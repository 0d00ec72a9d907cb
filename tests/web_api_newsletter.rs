//! Web API Newsletter Tests
//!
//! Integration tests for newsletter subscription endpoints.

use std::sync::Arc;

use ai_inventory::db::SubscriberRepository;
use ai_inventory::news::NewsCache;
use ai_inventory::web::handlers::AppState;
use ai_inventory::web::router::create_router;
use ai_inventory::Database;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

/// Create a test server with an in-memory database.
async fn create_test_server() -> (TestServer, Database) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let app_state = Arc::new(AppState::new(Arc::new(NewsCache::new())).with_database(db.clone()));
    let router = create_router(app_state, &[]);
    let server = TestServer::new(router).expect("Failed to create test server");

    (server, db)
}

#[tokio::test]
async fn test_subscribe_success() {
    let (server, db) = create_test_server().await;

    let response = server
        .post("/api/subscribe")
        .json(&json!({ "email": "  Reader@Example.com " }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": "Subscribed successfully" })
    );

    let repo = SubscriberRepository::new(db.pool());
    let stored = repo.get_by_email("reader@example.com").await.unwrap().unwrap();
    assert_eq!(stored.email, "reader@example.com");
}

#[tokio::test]
async fn test_subscribe_duplicate_conflict() {
    let (server, _db) = create_test_server().await;

    server
        .post("/api/subscribe")
        .json(&json!({ "email": "reader@example.com" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/subscribe")
        .json(&json!({ "email": "READER@example.com" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "CONFLICT");
    assert_eq!(body["error"]["message"], "Already subscribed");
}

#[tokio::test]
async fn test_subscribe_missing_email() {
    let (server, _db) = create_test_server().await;

    for body in [json!({}), json!({ "email": "" }), json!({ "email": "   " })] {
        let response = server.post("/api/subscribe").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"]["message"], "Email required");
    }
}

#[tokio::test]
async fn test_subscribe_invalid_email() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/subscribe")
        .json(&json!({ "email": "not-an-email" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["email"].is_array());
}

#[tokio::test]
async fn test_subscribe_malformed_json() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/subscribe")
        .content_type("application/json")
        .bytes("{\"email\":".into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_subscriber_count() {
    let (server, _db) = create_test_server().await;

    let body = server.get("/api/subscribers/count").await.json::<Value>();
    assert_eq!(body, json!({ "count": 0 }));

    for email in ["a@example.com", "b@example.com"] {
        server
            .post("/api/subscribe")
            .json(&json!({ "email": email }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let body = server.get("/api/subscribers/count").await.json::<Value>();
    assert_eq!(body, json!({ "count": 2 }));
}

#[tokio::test]
async fn test_newsletter_unavailable_without_database() {
    let app_state = Arc::new(AppState::new(Arc::new(NewsCache::new())));
    let server = TestServer::new(create_router(app_state, &[])).unwrap();

    let response = server
        .post("/api/subscribe")
        .json(&json!({ "email": "reader@example.com" }))
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    server
        .get("/api/subscribers/count")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_subscribe_database_failure_is_internal_error() {
    let (server, db) = create_test_server().await;
    db.close().await;

    let response = server
        .post("/api/subscribe")
        .json(&json!({ "email": "reader@example.com" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert_eq!(body["error"]["message"], "An internal error occurred");

    let response = server.get("/api/subscribers/count").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}
