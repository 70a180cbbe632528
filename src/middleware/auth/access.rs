//! access token 解決 → AuthCtx を extensions に入れる
//!
//! - `?jwt=<token>` または `Authorization: Bearer <token>` を TokenResolver に渡す
//! - credential なし → 匿名のまま通す (要認証かどうかは extractor 側で判断)
//! - credential あり・検証失敗 → 401 (匿名には落とさない)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// `/api/v1/*` に認証を掛けるための middleware を適用する。
///
/// 例：
/// ```ignore
/// let v1 = api::v1::routes(state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let resolved = match state.auth.resolve(req.uri(), req.headers()).await {
        Ok(resolved) => resolved,
        Err(err) => {
            tracing::warn!(
                error = %err,
                code = err.code(),
                path = %req.uri().path(),
                "access token rejected"
            );
            return Err(err.into());
        }
    };

    if let Some(resolved) = resolved {
        tracing::debug!(
            user_id = %resolved.principal.user_id,
            source = ?resolved.source,
            "request authenticated"
        );

        // middleware → extractor への受け渡し
        req.extensions_mut().insert(AuthCtx::from(resolved));
    }

    Ok(next.run(req).await)
}
