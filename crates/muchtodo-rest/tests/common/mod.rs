#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use muchtodo_config::{SecurityConfig, ServerConfig};
use muchtodo_repository::{InMemoryTodoRepository, InMemoryUserRepository};
use muchtodo_rest::{create_router, middleware::AuthMiddlewareState, AppState};
use muchtodo_security::{ManualClock, PasswordHasher, TokenProvider};
use muchtodo_service::{
    AuthServiceImpl, InMemoryCacheStore, TodoServiceImpl, UserServiceImpl,
    UsernameAvailabilityService,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUserRepository>,
    pub cache: Arc<InMemoryCacheStore>,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let todos = Arc::new(InMemoryTodoRepository::new());
        let cache = Arc::new(InMemoryCacheStore::new());
        let clock = Arc::new(ManualClock::default());

        let security = SecurityConfig {
            jwt_secret: "integration-test-secret".to_string(),
            jwt_expiration_hours: 1,
            password_hash_cost: 1,
        };
        let tokens = Arc::new(TokenProvider::new(&security, clock.clone()).unwrap());
        let hasher = Arc::new(PasswordHasher::with_cost(security.password_hash_cost));
        let availability = Arc::new(UsernameAvailabilityService::new(
            cache.clone(),
            users.clone(),
            Duration::from_secs(3600),
        ));

        let state = AppState::new(
            Arc::new(AuthServiceImpl::new(
                users.clone(),
                availability.clone(),
                hasher.clone(),
                tokens.clone(),
            )),
            Arc::new(UserServiceImpl::new(users.clone(), todos.clone(), availability, hasher)),
            Arc::new(TodoServiceImpl::new(todos)),
            users.clone(),
            cache.clone(),
        );
        let router = create_router(state, AuthMiddlewareState::new(tokens), &ServerConfig::default());

        Self {
            router,
            users,
            cache,
            clock,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
        (status, body)
    }

    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let (status, bytes) = self.send(request).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Registers `username` and returns its token.
    pub async fn register(&self, username: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/auth/register",
                None,
                Some(serde_json::json!({ "username": username, "password": "password123" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }
}
