/// Factory: build `TokenResolver` from application `Config`.
use std::str::FromStr;
use std::sync::Arc;

use axum::http::HeaderName;
use sqlx::PgPool;

use crate::config::AuthSettings;
use crate::error::AppError;
use crate::services::auth::access_jwt::TokenValidator;
use crate::services::auth::header::HeaderTokenExtractor;
use crate::services::auth::principal::{
    PgPrincipalResolver, PrincipalResolver, StatelessPrincipalResolver,
};
use crate::services::auth::token_resolver::{ResolverMode, TokenResolver};

pub fn build_token_resolver(
    settings: &AuthSettings,
    db: Option<PgPool>,
) -> Result<Arc<TokenResolver>, AppError> {
    let validator = TokenValidator::new(settings).map_err(|err| {
        tracing::error!(error = %err, "failed to build access token validator");
        AppError::Internal
    })?;

    let header_name = HeaderName::from_str(&settings.header_name).map_err(|_| AppError::Internal)?;
    let header = HeaderTokenExtractor::new(header_name, &settings.header_types);

    let principals: Arc<dyn PrincipalResolver> = match db {
        Some(db) => Arc::new(PgPrincipalResolver::new(db)),
        None => Arc::new(StatelessPrincipalResolver),
    };
    let backend = principals.backend_name();

    let resolver = TokenResolver::new(settings.resolver_mode, header, validator, principals);

    if resolver.mode() == ResolverMode::QueryOnly {
        tracing::warn!("header-based authentication disabled (AUTH_RESOLVER_MODE=query_only)");
    }

    tracing::info!(
        mode = %resolver.mode(),
        principals = backend,
        header = %settings.header_name,
        "token resolver ready"
    );

    Ok(Arc::new(resolver))
}
