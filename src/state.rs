/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: TokenResolver, events: EventBus, gis: 起動時に判定した GIS 対応状況
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::{auth::TokenResolver, events::EventBus, gis::GisSupport};

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<TokenResolver>,
    pub events: EventBus,
    pub gis: Arc<GisSupport>,
}

impl AppState {
    pub fn new(auth: Arc<TokenResolver>, events: EventBus, gis: GisSupport) -> Self {
        Self {
            auth,
            events,
            gis: Arc::new(gis),
        }
    }
}
