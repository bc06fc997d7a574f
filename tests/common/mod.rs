//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

pub use bistro::config::AccessPolicy;
pub use bistro::db::{AppState, Collection, Document, Filter, collection};
use bistro::error::{AppError, Result};
use bistro::jwt::TokenService;
use bistro::payments::{PaymentIntent, PaymentIntents};

pub const TEST_SECRET: &str = "test-token-secret";
pub const ADMIN_EMAIL: &str = "admin@bistro.test";
pub const USER_EMAIL: &str = "diner@bistro.test";

/// Records every intent request; fails when `fail` is set.
#[derive(Default)]
pub struct FakePayments {
    pub requests: Mutex<Vec<(u64, String)>>,
    pub fail: bool,
}

#[async_trait]
impl PaymentIntents for FakePayments {
    async fn create_intent(&self, amount: u64, currency: &str) -> Result<PaymentIntent> {
        if self.fail {
            return Err(AppError::PaymentProvider("card_declined".into()));
        }
        self.requests
            .lock()
            .unwrap()
            .push((amount, currency.to_string()));
        Ok(PaymentIntent {
            id: format!("pi_test_{}", amount),
            client_secret: format!("pi_test_{}_secret_abc", amount),
        })
    }
}

pub fn create_test_app_state_with(policy: AccessPolicy, payments: Arc<FakePayments>) -> AppState {
    AppState {
        db: bistro::db::open_memory_pool().unwrap(),
        tokens: TokenService::new(TEST_SECRET),
        payments,
        policy,
    }
}

pub fn create_test_app_state() -> AppState {
    create_test_app_state_with(AccessPolicy::default(), Arc::new(FakePayments::default()))
}

pub fn app(state: AppState) -> Router {
    bistro::router(state)
}

pub fn doc(value: Value) -> Document {
    value.as_object().cloned().expect("document must be a JSON object")
}

/// Insert a user document directly; returns its id.
pub fn create_test_user(state: &AppState, email: &str, admin: bool) -> String {
    let conn = state.db.get().unwrap();
    let mut user = doc(serde_json::json!({ "email": email, "name": "Test User" }));
    if admin {
        user.insert("role".into(), Value::from("admin"));
    }
    collection::insert_one(&conn, Collection::Users, user)
        .unwrap()
        .inserted_id
        .unwrap()
}

pub fn insert_doc(state: &AppState, coll: Collection, value: Value) -> String {
    let conn = state.db.get().unwrap();
    collection::insert_one(&conn, coll, doc(value))
        .unwrap()
        .inserted_id
        .unwrap()
}

pub fn all_docs(state: &AppState, coll: Collection) -> Vec<Document> {
    let conn = state.db.get().unwrap();
    collection::find_all(&conn, coll).unwrap()
}

pub fn token_for(email: &str) -> String {
    TokenService::new(TEST_SECRET).issue(email).unwrap()
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request and return the status and the parsed JSON body (Null if empty or not JSON).
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}
