//! JSON view of the region directory for script-driven selects.

use axum::Json;
use axum::extract::{Path, State};
use handy_derive::{api_handler, api_model};
use handy_domain::constants::REGIONS_TAG;
use handy_domain::regions::RegionDirectory;
use std::sync::Arc;

#[api_model]
/// All region names
pub struct RegionList {
    pub regions: Vec<String>,
}

#[api_model]
/// Locality options of one region; empty for an unknown region
pub struct LocalityList {
    pub region: String,
    pub localities: Vec<String>,
}

#[api_handler(
    get,
    path = "/api/regions",
    responses((status = OK, description = "Region names", body = RegionList)),
    tag = REGIONS_TAG,
)]
pub(super) async fn list_regions(State(regions): State<Arc<RegionDirectory>>) -> Json<RegionList> {
    Json(RegionList { regions: regions.regions().map(str::to_owned).collect() })
}

#[api_handler(
    get,
    path = "/api/regions/{region}/localities",
    params(("region" = String, Path, description = "Region name")),
    responses((status = OK, description = "Locality options", body = LocalityList)),
    tag = REGIONS_TAG,
)]
pub(super) async fn list_localities(
    State(regions): State<Arc<RegionDirectory>>,
    Path(region): Path<String>,
) -> Json<LocalityList> {
    let localities = regions.localities(&region).to_vec();
    Json(LocalityList { region, localities })
}
