/*
 * Responsibility
 * - GET /me の response DTO
 */
use serde::Serialize;

use crate::api::v1::extractors::AuthCtx;
use crate::services::auth::token_resolver::CredentialSource;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: String,
    pub username: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub credential_source: CredentialSource,
    pub token_expires_at: u64,
}

impl From<AuthCtx> for MeResponse {
    fn from(ctx: AuthCtx) -> Self {
        Self {
            user_id: ctx.principal.user_id,
            username: ctx.principal.username,
            is_staff: ctx.principal.is_staff,
            is_superuser: ctx.principal.is_superuser,
            credential_source: ctx.source,
            token_expires_at: ctx.expires_at,
        }
    }
}
