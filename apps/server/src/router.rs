use axum::Router;
use handy::kernel::server::state::AppState;
use handy::server::router::{feature_router, system_router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(info(title = "Handyman", description = "Pages, forms and the regions API"))]
struct ApiDoc;

pub(crate) fn init(state: AppState) -> Router {
    let static_dir = state.config.storage.static_dir.clone();

    let (routes, api_doc) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(system_router())
        .merge(feature_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .split_for_parts();

    Router::new()
        .merge(routes)
        .merge(Scalar::with_url("/docs", api_doc))
        .fallback_service(ServeDir::new(static_dir))
}
