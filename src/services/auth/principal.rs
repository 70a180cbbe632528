//! Validated token → Principal.
//!
//! Two backends:
//! - `StatelessPrincipalResolver`: trusts the claims, no lookup.
//! - `PgPrincipalResolver`: one `auth_user` lookup per request.
use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;

use crate::repos::user_repo::{self, UserRow};
use crate::services::auth::access_jwt::{TokenError, ValidatedToken};
use crate::services::auth::error::AuthError;

/// The authenticated identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub user_id: String,
    pub username: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn resolve(&self, token: &ValidatedToken) -> Result<Principal, AuthError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatelessPrincipalResolver;

#[async_trait]
impl PrincipalResolver for StatelessPrincipalResolver {
    fn backend_name(&self) -> &'static str {
        "claims"
    }

    async fn resolve(&self, token: &ValidatedToken) -> Result<Principal, AuthError> {
        Ok(Principal {
            user_id: token.user_id.clone(),
            username: token.username.clone(),
            is_active: true,
            is_staff: token.is_staff,
            is_superuser: token.is_superuser,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PgPrincipalResolver {
    db: PgPool,
}

impl PgPrincipalResolver {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PrincipalResolver for PgPrincipalResolver {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn resolve(&self, token: &ValidatedToken) -> Result<Principal, AuthError> {
        let id: i64 = token
            .user_id
            .parse()
            .map_err(|_| AuthError::InvalidToken(TokenError::InvalidUserId))?;

        let row = user_repo::get(&self.db, id).await?;
        principal_from_row(row)
    }
}

/// Not found / inactive users never authenticate.
pub fn principal_from_row(row: Option<UserRow>) -> Result<Principal, AuthError> {
    let row = row.ok_or(AuthError::UserNotFound)?;
    if !row.is_active {
        return Err(AuthError::UserInactive);
    }

    Ok(Principal {
        user_id: row.id.to_string(),
        username: Some(row.username),
        is_active: row.is_active,
        is_staff: row.is_staff,
        is_superuser: row.is_superuser,
    })
}
