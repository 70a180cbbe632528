//! Shared helpers for router-level tests.
#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use serde_json::{Value, json};
use uuid::Uuid;

use odm_gateway::app::{build_router, build_state};
use odm_gateway::config::Config;

pub const SECRET: &str = "integration-test-secret";

pub fn config(extra: &[(&str, &str)]) -> Config {
    let mut pairs: Vec<(String, String)> = vec![
        ("JWT_SECRET".to_string(), SECRET.to_string()),
        ("GIS_PROBE".to_string(), "off".to_string()),
    ];
    pairs.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));

    Config::from_lookup(|key: &str| {
        pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .expect("test config")
}

pub async fn test_app() -> Router {
    test_app_with(&[]).await
}

pub async fn test_app_with(extra: &[(&str, &str)]) -> Router {
    let config = config(extra);
    let state = build_state(&config).await.expect("test state");
    build_router(state, &config)
}

pub fn sign_with(secret: &str, claims: &Value) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        claims,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("sign token")
}

pub fn claims_for(user: &str) -> Value {
    let now = chrono::Utc::now().timestamp();
    json!({
        "token_type": "access",
        "exp": now + 300,
        "iat": now,
        "jti": Uuid::new_v4().simple().to_string(),
        "user_id": user,
        "username": user,
    })
}

pub fn token_for(user: &str) -> String {
    sign_with(SECRET, &claims_for(user))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_header(uri: &str, name: &str, value: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(name, value)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
