/*
 * Responsibility
 * - GET /api/v1/health (疎通用 + GIS 対応状況)
 */
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({"status": "ok", "gis": state.gis.as_ref()})),
    )
}
