mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use muchtodo_service::{CacheExt, CacheStore};
use serde_json::json;

#[tokio::test]
async fn ping_and_root() {
    let app = TestApp::new();

    let (status, body) = app.call(Method::GET, "/ping", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "pong" }));

    let (status, _) = app.call(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = TestApp::new();
    let (status, body) = app.call(Method::GET, "/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Route not found" }));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new();
    let (status, body) = app.call(Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/auth/register"].is_object());
}

#[tokio::test]
async fn health_reports_database_outage() {
    let app = TestApp::new();

    let (status, body) = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cache"], "up");

    app.users.set_offline(true);
    let (status, body) = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], "down");
}

#[tokio::test]
async fn register_then_username_check() {
    let app = TestApp::new();
    app.register("alice").await;

    let (status, body) = app.call(Method::GET, "/auth/username-check/alice", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "username": "alice", "available": false }));

    let (_, body) = app.call(Method::GET, "/auth/username-check/carol", None, None).await;
    assert_eq!(body["data"]["available"], true);
}

#[tokio::test]
async fn username_check_survives_cold_cache() {
    let app = TestApp::new();
    app.register("alice").await;
    app.cache.delete("username-taken:alice").await.unwrap();

    let (_, body) = app.call(Method::GET, "/auth/username-check/alice", None, None).await;
    assert_eq!(body["data"]["available"], false);
    assert!(app.cache.lookup("username-taken:alice").await.is_hit());
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = TestApp::new();
    app.register("alice").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": "alice", "password": "password456" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn invalid_registration_has_field_details() {
    let app = TestApp::new();
    let (status, body) = app
        .call(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": "a b", "password": "short" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn login_flow() {
    let app = TestApp::new();
    app.register("alice").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "Bearer");

    let (wrong_status, wrong_body) = app
        .call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "password999" })),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "mallory", "password": "password123" })),
        )
        .await;
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);

    let (status, body) = app.call(Method::POST, "/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["message"].is_string());
}

#[tokio::test]
async fn rename_updates_availability() {
    let app = TestApp::new();
    let token = app.register("alice").await;
    app.register("bob").await;

    let (status, _) = app
        .call(Method::PUT, "/users/me", Some(&token), Some(json!({ "username": "bob" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .call(Method::PUT, "/users/me", Some(&token), Some(json!({ "username": "alicia" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alicia");

    let (_, body) = app.call(Method::GET, "/auth/username-check/alice", None, None).await;
    assert_eq!(body["data"]["available"], true);
    let (_, body) = app.call(Method::GET, "/auth/username-check/alicia", None, None).await;
    assert_eq!(body["data"]["available"], false);
}

#[tokio::test]
async fn change_password_then_login() {
    let app = TestApp::new();
    let token = app.register("alice").await;

    let (status, _) = app
        .call(
            Method::PUT,
            "/users/me/password",
            Some(&token),
            Some(json!({ "current_password": "password123", "new_password": "password456" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "password456" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn delete_account_frees_username() {
    let app = TestApp::new();
    let token = app.register("alice").await;

    let (status, _) = app.call(Method::DELETE, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.call(Method::GET, "/auth/username-check/alice", None, None).await;
    assert_eq!(body["data"]["available"], true);
    app.register("alice").await;
}

#[tokio::test]
async fn todo_crud_is_scoped_to_owner() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let (status, body) = app
        .call(Method::POST, "/todos", Some(&alice), Some(json!({ "title": "Buy milk" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let path = format!("/todos/{id}");

    let (status, body) = app
        .call(Method::PUT, &path, Some(&alice), Some(json!({ "completed": true })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["completed"], true);
    assert_eq!(body["data"]["title"], "Buy milk");

    let (_, body) = app.call(Method::GET, "/todos", Some(&alice), None).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (_, body) = app.call(Method::GET, "/todos", Some(&bob), None).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));

    let (status, _) = app.call(Method::GET, &path, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.call(Method::DELETE, &path, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.call(Method::DELETE, &path, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.call(Method::GET, &path, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_todo_id_is_bad_request() {
    let app = TestApp::new();
    let token = app.register("alice").await;

    let (status, _) = app.call(Method::GET, "/todos/not-a-uuid", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
