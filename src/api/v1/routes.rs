/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - access middleware は /health 以外の v1 に掛ける (匿名は通し、要認証は extractor で判断)
 * - /health は credential を見ない (古い token を持つクライアントでも 200)
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{capabilities::capabilities, health::health, me::me};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .route("/capabilities", get(capabilities));

    Router::new()
        .route("/health", get(health))
        .merge(middleware::auth::access::apply(protected, state))
}
