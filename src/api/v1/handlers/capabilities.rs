use axum::{Json, extract::State};

use crate::api::v1::dto::capabilities::CapabilitiesResponse;
use crate::api::v1::extractors::MaybeAuthCtx;
use crate::state::AppState;

pub async fn capabilities(
    State(state): State<AppState>,
    MaybeAuthCtx(ctx): MaybeAuthCtx,
) -> Json<CapabilitiesResponse> {
    Json(CapabilitiesResponse {
        gis: state.gis.as_ref().clone(),
        authenticated: ctx.is_some(),
        user_id: ctx.map(|c| c.principal.user_id),
    })
}
