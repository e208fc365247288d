mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use chrono::Duration;
use common::TestApp;

fn me(authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri("/users/me");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn valid_token_reaches_handler() {
    let app = TestApp::new();
    let token = app.register("alice").await;

    let (status, body) = app.call(Method::GET, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice");
}

#[tokio::test]
async fn tampered_token_looks_like_missing_header() {
    let app = TestApp::new();
    let token = app.register("alice").await;
    let other = app.register("bob").await;

    // bob's payload under alice's signature
    let a: Vec<&str> = token.split('.').collect();
    let b: Vec<&str> = other.split('.').collect();
    let tampered = format!("{}.{}.{}", a[0], b[1], a[2]);

    let (missing_status, missing_body) = app.send(me(None)).await;
    let (tampered_status, tampered_body) = app.send(me(Some(&format!("Bearer {}", tampered)))).await;

    assert_eq!(missing_status, StatusCode::UNAUTHORIZED);
    assert_eq!(tampered_status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing_body, tampered_body);
}

#[tokio::test]
async fn every_rejection_has_the_same_shape() {
    let app = TestApp::new();
    let token = app.register("alice").await;
    let (_, reference) = app.send(me(None)).await;

    for header_value in [
        "Basic YWxpY2U6c2VjcmV0".to_string(),
        "Bearer".to_string(),
        "Bearer not.a.token".to_string(),
        token.clone(),
    ] {
        let (status, body) = app.send(me(Some(&header_value))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "header: {header_value}");
        assert_eq!(body, reference, "header: {header_value}");
    }

    let json: serde_json::Value = serde_json::from_slice(&reference).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = TestApp::new();
    let token = app.register("alice").await;
    let (_, reference) = app.send(me(None)).await;

    app.clock.advance(Duration::minutes(59));
    let (status, _) = app.call(Method::GET, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    app.clock.advance(Duration::minutes(2));
    let (status, body) = app.send(me(Some(&format!("Bearer {}", token)))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, reference);
}

#[tokio::test]
async fn token_for_deleted_account_is_not_found() {
    let app = TestApp::new();
    let token = app.register("alice").await;

    let (status, _) = app.call(Method::DELETE, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // still a valid signature; the account is gone
    let (status, _) = app.call(Method::GET, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn todos_require_auth() {
    let app = TestApp::new();
    let (status, _) = app.call(Method::GET, "/todos", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
