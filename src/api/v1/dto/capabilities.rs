use serde::Serialize;

use crate::services::gis::GisSupport;

#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    pub gis: GisSupport,
    pub authenticated: bool,
    pub user_id: Option<String>,
}
