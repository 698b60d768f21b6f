use std::sync::Arc;

use agenda_api::{ApiState, build_router, middleware::auth::{Claims, JwtVerifier}};
use agenda_db::{AgendaStore, mock::MemoryStore};
use axum::http::{HeaderName, HeaderValue, header::AUTHORIZATION};
use axum_test::{TestResponse, TestServer};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use uuid::Uuid;

pub const TEST_SECRET: &str = "handler-test-secret";

pub fn token_for(user: Uuid) -> String {
    let claims = Claims {
        sub: user.to_string(),
        exp: Utc::now().timestamp() + 3600,
        aud: None,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_SECRET.as_bytes())).unwrap()
}

pub fn auth_header(user: Uuid) -> (HeaderName, HeaderValue) {
    let value = HeaderValue::from_str(&format!("Bearer {}", token_for(user))).unwrap();
    (AUTHORIZATION, value)
}

pub fn server_with_store(store: Arc<dyn AgendaStore>) -> TestServer {
    let state = Arc::new(ApiState::new(store, JwtVerifier::new(TEST_SECRET, None)));
    TestServer::new(build_router(state)).unwrap()
}

/// A server over a fresh in-memory store
pub struct TestContext {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let server = server_with_store(store.clone());
        Self { server, store }
    }

    pub async fn get(&self, user: Uuid, path: &str) -> TestResponse {
        let (name, value) = auth_header(user);
        self.server.get(path).add_header(name, value).await
    }

    pub async fn put(&self, user: Uuid, path: &str, body: &Value) -> TestResponse {
        let (name, value) = auth_header(user);
        self.server.put(path).add_header(name, value).json(body).await
    }

    pub async fn post(&self, user: Uuid, path: &str, body: &Value) -> TestResponse {
        let (name, value) = auth_header(user);
        self.server.post(path).add_header(name, value).json(body).await
    }

    pub async fn delete(&self, user: Uuid, path: &str) -> TestResponse {
        let (name, value) = auth_header(user);
        self.server.delete(path).add_header(name, value).await
    }

    /// Saves a profile for `user` and returns the response body
    pub async fn create_profile(&self, user: Uuid, business_name: &str) -> Value {
        let response = self
            .put(user, "/api/profile", &json!({ "business_name": business_name }))
            .await;
        assert_eq!(response.status_code(), 200);
        response.json::<Value>()
    }

    /// Creates a service for `user` and returns its id
    pub async fn create_service(&self, user: Uuid, name: &str, duration: i64) -> String {
        let response = self
            .post(user, "/api/services", &json!({ "name": name, "duration": duration }))
            .await;
        assert_eq!(response.status_code(), 201);
        response.json::<Value>()["service"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

/// Paths of every issue in a 400 validation body
pub fn issue_paths(body: &Value) -> Vec<Value> {
    body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["path"].clone())
        .collect()
}
