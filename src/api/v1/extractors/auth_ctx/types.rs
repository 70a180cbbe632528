/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックや principal 解決は services/auth 側の責務
 * - ここは「型（契約）」として固定化する
 */
use crate::services::auth::principal::Principal;
use crate::services::auth::token_resolver::{CredentialSource, Resolved};

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `principal` は解決済みの主体
/// - `source` は credential の取得元 (query / header)
/// - `jti` は監査/相関用
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub principal: Principal,
    pub source: CredentialSource,
    pub jti: String,
    pub expires_at: u64,
}

impl From<Resolved> for AuthCtx {
    fn from(resolved: Resolved) -> Self {
        Self {
            principal: resolved.principal,
            source: resolved.source,
            jti: resolved.token.jti,
            expires_at: resolved.token.exp,
        }
    }
}
