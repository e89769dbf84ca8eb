//! Price estimator endpoints
//!
//! ```text
//! GET  /api/estimate/modules            catalog, base price and duration
//! POST /api/estimate {"modules": [...]} price and duration of a selection
//! ```

use crate::{
    extract::ApiJson,
    routes::{ok, DataResponse},
};
use axum::Json;
use emerald_shared::pricing::{
    self, Estimate, ModuleDetail, BASE_DURATION_HALF_WEEKS, BASE_PRICE, CATALOG,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    /// Catalog keys; unknown keys and repeats are ignored
    #[serde(default)]
    pub modules: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub base_price: i64,

    /// Weeks
    pub base_duration: f64,

    pub modules: Vec<ModuleDetail>,
}

pub async fn estimate(ApiJson(req): ApiJson<EstimateRequest>) -> Json<DataResponse<Estimate>> {
    ok(pricing::estimate(&req.modules))
}

pub async fn list_catalog() -> Json<DataResponse<Catalog>> {
    ok(Catalog {
        base_price: BASE_PRICE,
        base_duration: f64::from(BASE_DURATION_HALF_WEEKS) / 2.0,
        modules: CATALOG.iter().map(ModuleDetail::from).collect(),
    })
}
