#![cfg(feature = "server")]

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use handy_backend::Backend;
use handy_kernel::domain::config::AppConfig;
use handy_kernel::domain::regions::RegionDirectory;
use handy_kernel::server::router::system_router;
use handy_kernel::server::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

fn app() -> axum::Router {
    let state = AppState::builder()
        .config(AppConfig::default())
        .backend(Backend::builder().url("mem://").init().unwrap())
        .regions(RegionDirectory::new([("Lagos", vec!["Ikeja", "Lekki"]), ("Abuja", vec!["Garki"])]))
        .build()
        .unwrap();
    let (router, _api) = system_router().split_for_parts();
    router.with_state(state)
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let response =
        app().oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_up() {
    let (status, body) = get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");
}

#[tokio::test]
async fn regions_are_listed() {
    let (_, body) = get_json("/api/regions").await;
    assert_eq!(body["regions"], serde_json::json!(["Abuja", "Lagos"]));
}

#[tokio::test]
async fn localities_follow_the_region() {
    let (status, body) = get_json("/api/regions/Lagos/localities").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["localities"], serde_json::json!(["Ikeja", "Lekki"]));

    let (status, body) = get_json("/api/regions/Atlantis/localities").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["localities"], serde_json::json!([]));
}
