use super::{health, regions};
use crate::server::state::AppState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Health probe and the regions API.
pub fn system_router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health::health_handler))
        .routes(routes!(regions::list_regions))
        .routes(routes!(regions::list_localities))
}
