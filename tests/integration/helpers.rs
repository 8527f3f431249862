//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::{Duration, NaiveDate, Utc};
use http::{Request, StatusCode};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::Value;
use tower::ServiceExt;

use venue_api::AppState;
use venue_auth::Claims;
use venue_core::config::{AppConfig, DatabaseProvider};
use venue_core::types::UserId;
use venue_database::memory::{MemoryBookingStore, MemorySpaceStore};
use venue_entity::user::UserRole;

pub const JWT_SECRET: &str = "integration-test-secret";
pub const PAYMENT_SECRET: &str = "integration-payment-secret";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application backed by in-memory stores
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.provider = DatabaseProvider::Memory;
        config.auth.jwt_secret = JWT_SECRET.to_string();
        config.payment.signature_secret = PAYMENT_SECRET.to_string();

        let state = AppState::new(
            config.clone(),
            None,
            Arc::new(MemorySpaceStore::new()),
            Arc::new(MemoryBookingStore::new()),
        )
        .expect("Failed to build app state");

        Self {
            router: venue_api::build_app(state),
            config,
        }
    }

    /// Mint an access token the way the identity service would
    pub fn token(&self, user_id: UserId, role: UserRole) -> String {
        let claims = Claims::new(user_id, role, 3600);
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.auth.jwt_secret.as_bytes()),
        )
        .expect("Failed to sign token")
    }

    /// A fresh user of `role` and their token
    pub fn user(&self, role: UserRole) -> (UserId, String) {
        let id = UserId::new();
        (id, self.token(id, role))
    }

    /// Create a space as `token` and return its ID
    pub async fn create_space(&self, token: &str, capacity: i32, pricing: Value) -> String {
        let response = self
            .request(
                "POST",
                "/api/spaces",
                Some(serde_json::json!({
                    "name": "Riverside Hall",
                    "description": "Ground floor hall",
                    "address": "1 River Road",
                    "spaceType": "event",
                    "capacity": capacity,
                    "pricing": pricing,
                })),
                Some(token),
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Space creation failed: {:?}",
            response.body
        );
        response.body["data"]["id"]
            .as_str()
            .expect("No id in space response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);

        if body.is_some() {
            req = req.header("Content-Type", "application/json");
        }
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// A date a week out, inside the default advance booking window.
pub fn booking_date() -> NaiveDate {
    Utc::now().date_naive() + Duration::days(7)
}

/// Plain hourly pricing with no rules.
pub fn hourly(base_price: u32) -> Value {
    serde_json::json!({ "basePrice": base_price })
}

/// Parse a JSON decimal (string or number) for comparisons.
pub fn decimal(value: &Value) -> rust_decimal::Decimal {
    match value {
        Value::String(s) => s.parse().expect("Invalid decimal string"),
        Value::Number(n) => n.to_string().parse().expect("Invalid decimal number"),
        other => panic!("Expected a decimal, got {other:?}"),
    }
}
