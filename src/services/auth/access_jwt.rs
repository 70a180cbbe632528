use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::config::{AuthSettings, JwtKey};

/// Only access tokens are accepted by the resolver.
pub const ACCESS_TOKEN_TYPE: &str = "access";

// Errors returned by access-token verification + strict claim validation.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("token is not valid UTF-8")]
    NotUtf8,
    #[error("Token has wrong type")]
    WrongType,
    #[error("Token has no id")]
    MissingJti,
    #[error("Token contained no recognizable user identification")]
    MissingUserId,
    #[error("user identifier is not a valid id for this backend")]
    InvalidUserId,
}

/// Access token (JWT) claims.
///
/// NOTE:
/// - `user_id` may arrive as a JSON number or a string; it is normalised in `verify`.
/// - `iss` / `aud` are checked by `Validation` only when configured.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    pub exp: u64,

    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub jti: Option<String>,
    #[serde(default)]
    pub iat: Option<u64>,

    #[serde(default)]
    pub user_id: Option<serde_json::Value>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub is_staff: Option<bool>,
    #[serde(default)]
    pub is_superuser: Option<bool>,
}

/// 検証済みトークン (principal 解決に渡す型)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedToken {
    pub user_id: String,
    pub jti: String,
    pub exp: u64,
    pub iat: Option<u64>,

    pub username: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
}

fn normalise_user_id(raw: Option<&serde_json::Value>) -> Option<String> {
    match raw? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Access-token verifier (HS256 or EdDSA).
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenValidator {
    pub fn new(settings: &AuthSettings) -> Result<Self, TokenError> {
        let (decoding_key, algorithm) = match &settings.key {
            JwtKey::Hs256Secret(secret) => {
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
            JwtKey::EdDsaPublicPem(pem) => {
                (DecodingKey::from_ed_pem(pem.as_bytes())?, Algorithm::EdDSA)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = settings.leeway_seconds;

        let mut required = vec!["exp"];
        if let Some(issuer) = &settings.issuer {
            validation.set_issuer(&[issuer]);
            required.push("iss");
        }
        match &settings.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.push("aud");
            }
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(&required);

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Verify the signature and registered claims, then the access-token conventions:
    /// `token_type == "access"`, a `jti`, and a recognizable user identifier.
    pub fn verify(&self, raw: &[u8]) -> Result<ValidatedToken, TokenError> {
        let token = std::str::from_utf8(raw).map_err(|_| TokenError::NotUtf8)?;

        let claims =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?
                .claims;

        if claims.token_type.as_deref() != Some(ACCESS_TOKEN_TYPE) {
            return Err(TokenError::WrongType);
        }

        let jti = claims
            .jti
            .filter(|j| !j.trim().is_empty())
            .ok_or(TokenError::MissingJti)?;

        let user_id =
            normalise_user_id(claims.user_id.as_ref()).ok_or(TokenError::MissingUserId)?;

        Ok(ValidatedToken {
            user_id,
            jti,
            exp: claims.exp,
            iat: claims.iat,
            username: claims.username,
            is_staff: claims.is_staff.unwrap_or(false),
            is_superuser: claims.is_superuser.unwrap_or(false),
        })
    }
}
