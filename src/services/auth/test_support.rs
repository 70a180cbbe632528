//! Token fixtures shared by the auth unit tests.
use serde_json::{Value, json};
use uuid::Uuid;

use crate::config::{AuthSettings, JwtKey};
use crate::services::auth::token_resolver::ResolverMode;

pub const TEST_SECRET: &str = "unit-test-signing-secret";

pub fn settings() -> AuthSettings {
    AuthSettings {
        key: JwtKey::Hs256Secret(TEST_SECRET.to_string()),
        issuer: None,
        audience: None,
        leeway_seconds: 0,
        header_name: "authorization".to_string(),
        header_types: vec!["Bearer".to_string(), "JWT".to_string()],
        resolver_mode: ResolverMode::QueryThenHeader,
    }
}

pub fn claims_for(user_id: Value, username: &str) -> Value {
    let now = chrono::Utc::now().timestamp();
    json!({
        "token_type": "access",
        "exp": now + 300,
        "iat": now,
        "jti": Uuid::new_v4().simple().to_string(),
        "user_id": user_id,
        "username": username,
    })
}

pub fn sign(claims: &Value) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("sign test token")
}
