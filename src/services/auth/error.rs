use crate::repos::error::RepoError;
use crate::services::auth::access_jwt::TokenError;

/// Authentication failures raised while resolving a request's credential.
///
/// "No credential" is not represented here; the resolver returns `Ok(None)` for it.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header must contain two space-delimited values")]
    BadAuthorizationHeader,

    #[error("Given token not valid for any token type")]
    InvalidToken(#[source] TokenError),

    #[error("User not found")]
    UserNotFound,

    #[error("User is inactive")]
    UserInactive,

    // Not an authentication failure; surfaced as 500.
    #[error("principal lookup failed")]
    Backend(#[from] RepoError),
}

impl AuthError {
    /// Stable machine-readable code for the error body.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::BadAuthorizationHeader => "bad_authorization_header",
            AuthError::InvalidToken(_) => "token_not_valid",
            AuthError::UserNotFound => "user_not_found",
            AuthError::UserInactive => "user_inactive",
            AuthError::Backend(_) => "internal_error",
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        AuthError::InvalidToken(e)
    }
}
