//! Request → (Principal, ValidatedToken).
//!
//! The `jwt` query parameter wins over the header when present and non-empty.
//! Browsers cannot attach headers to tile/image requests, so map clients pass the
//! token in the URL instead.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use axum::http::{HeaderMap, Uri};
use serde::Serialize;

use crate::services::auth::access_jwt::{TokenValidator, ValidatedToken};
use crate::services::auth::error::AuthError;
use crate::services::auth::header::HeaderTokenExtractor;
use crate::services::auth::principal::{Principal, PrincipalResolver};

pub const QUERY_PARAM: &str = "jwt";

/// Where the raw credential was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    Query,
    Header,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub bytes: Vec<u8>,
    pub source: CredentialSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolverMode {
    /// `?jwt=` first, then the authorization header.
    #[default]
    QueryThenHeader,
    /// `?jwt=` only; requests without it stay anonymous even with a valid header.
    QueryOnly,
}

impl FromStr for ResolverMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query_then_header" | "fallback" => Ok(Self::QueryThenHeader),
            "query_only" => Ok(Self::QueryOnly),
            other => Err(format!("unknown resolver mode: {other}")),
        }
    }
}

impl fmt::Display for ResolverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueryThenHeader => f.write_str("query_then_header"),
            Self::QueryOnly => f.write_str("query_only"),
        }
    }
}

/// Successful resolution.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub principal: Principal,
    pub token: ValidatedToken,
    pub source: CredentialSource,
}

pub struct TokenResolver {
    mode: ResolverMode,
    header: HeaderTokenExtractor,
    validator: TokenValidator,
    principals: Arc<dyn PrincipalResolver>,
}

impl fmt::Debug for TokenResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResolver")
            .field("mode", &self.mode)
            .field("header", &self.header)
            .field("validator", &self.validator)
            .field("principals", &self.principals.backend_name())
            .finish()
    }
}

/// Value of the `jwt` query parameter, if present and non-empty.
///
/// Repeated parameters: the last one wins.
pub fn query_token(uri: &Uri) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
        .last()
        .filter(|value| !value.is_empty())
}

impl TokenResolver {
    pub fn new(
        mode: ResolverMode,
        header: HeaderTokenExtractor,
        validator: TokenValidator,
        principals: Arc<dyn PrincipalResolver>,
    ) -> Self {
        Self {
            mode,
            header,
            validator,
            principals,
        }
    }

    pub fn mode(&self) -> ResolverMode {
        self.mode
    }

    /// Locate the raw credential without validating it.
    pub fn raw_token(&self, uri: &Uri, headers: &HeaderMap) -> Result<Option<RawToken>, AuthError> {
        if let Some(token) = query_token(uri) {
            return Ok(Some(RawToken {
                bytes: token.into_bytes(),
                source: CredentialSource::Query,
            }));
        }

        match self.mode {
            ResolverMode::QueryOnly => Ok(None),
            ResolverMode::QueryThenHeader => Ok(self.header.extract(headers)?.map(|bytes| RawToken {
                bytes,
                source: CredentialSource::Header,
            })),
        }
    }

    /// `Ok(None)` means anonymous: no credential was offered.
    pub async fn resolve(
        &self,
        uri: &Uri,
        headers: &HeaderMap,
    ) -> Result<Option<Resolved>, AuthError> {
        let Some(raw) = self.raw_token(uri, headers)? else {
            return Ok(None);
        };

        let token = self.validator.verify(&raw.bytes).map_err(|err| {
            tracing::debug!(error = %err, source = ?raw.source, "token validation failed");
            AuthError::from(err)
        })?;

        let principal = self.principals.resolve(&token).await?;

        Ok(Some(Resolved {
            principal,
            token,
            source: raw.source,
        }))
    }
}
