use axum::Json;
use axum::http::header;
use axum::response::IntoResponse;
use handy_derive::{api_handler, api_model};
use handy_domain::constants::SYSTEM_TAG;
use std::sync::LazyLock;
use std::time::Instant;

#[api_model]
/// Liveness probe payload
pub struct HealthResponse {
    /// Always `up` while the process serves requests
    pub status: String,
    /// Crate version
    pub version: String,
    /// Seconds since the first probe
    pub uptime: u64,
}

static STARTED: LazyLock<Instant> = LazyLock::new(Instant::now);

#[api_handler(
    get,
    path = "/health",
    responses((status = OK, description = "Service is up", body = HealthResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler() -> impl IntoResponse {
    let body = HealthResponse {
        status: "up".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        uptime: STARTED.elapsed().as_secs(),
    };

    ([(header::CACHE_CONTROL, "no-store")], Json(body))
}
