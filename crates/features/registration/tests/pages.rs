#![cfg(feature = "server")]

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use handy_backend::{Backend, CallCounts, MemoryBackend};
use handy_domain::config::AppConfig;
use handy_domain::regions::RegionDirectory;
use handy_event_bus::EventBus;
use handy_kernel::server::state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

struct Harness {
    app: axum::Router,
    memory: Arc<MemoryBackend>,
}

fn harness(redirect_delay_seconds: u64) -> Harness {
    harness_with(redirect_delay_seconds, MemoryBackend::new())
}

fn harness_with(redirect_delay_seconds: u64, memory: MemoryBackend) -> Harness {
    let mut config = AppConfig::default();
    config.registration.redirect_delay_seconds = redirect_delay_seconds;

    let memory = Arc::new(memory);
    let backend = Backend::memory(memory.clone());
    let regions =
        Arc::new(RegionDirectory::new([("Lagos", vec!["Ikeja", "Lekki"]), ("Abuja", vec!["Garki"])]));
    let events = EventBus::new();

    let slice =
        handy_registration::init(&config.registration, backend.clone(), regions.clone(), events.clone())
            .unwrap();
    let state = AppState::builder()
        .config(config)
        .backend(backend)
        .regions(regions)
        .events(events)
        .register_slice(slice)
        .build()
        .unwrap();

    let (router, _api) = handy_registration::router().split_for_parts();
    Harness { app: router.with_state(state), memory }
}

async fn send(app: &axum::Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(fields: &[(&str, &str)]) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{k}={}", v.replace(' ', "+").replace('@', "%40")))
        .collect::<Vec<_>>()
        .join("&");
    Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn form_id(html: &str) -> String {
    let marker = r#"name="form_id" value=""#;
    let start = html.find(marker).unwrap() + marker.len();
    html[start..].split('"').next().unwrap().to_owned()
}

async fn open_form(app: &axum::Router, uri: &str) -> String {
    let response = send(app, get(uri)).await;
    assert_eq!(response.status(), StatusCode::OK);
    form_id(&body_text(response).await)
}

fn complete<'a>(id: &'a str, password: &'a str, confirm: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("form_id", id),
        ("name", "Ada Obi"),
        ("email", "ada@example.com"),
        ("password", password),
        ("confirm_password", confirm),
        ("region", "Lagos"),
        ("locality", "Lekki"),
        ("address", "12 Admiralty Way"),
        ("intent", "submit"),
    ]
}

#[tokio::test]
async fn fresh_form_has_no_cities_or_skill() {
    let h = harness(3);
    let html = body_text(send(&h.app, get("/auth/register")).await).await;

    assert!(html.contains(r#"<option value="Lagos">Lagos</option>"#));
    assert!(html.contains("disabled>"), "city selector starts disabled");
    assert!(!html.contains(r#"name="skill""#));
}

#[tokio::test]
async fn technician_link_shows_skill_field() {
    let h = harness(3);
    let html = body_text(send(&h.app, get("/auth/register?role=technician")).await).await;
    assert!(html.contains(r#"name="skill""#));
}

#[tokio::test]
async fn choosing_a_region_lists_its_cities() {
    let h = harness(3);
    let id = open_form(&h.app, "/auth/register").await;

    let response =
        send(&h.app, post(&[("form_id", &id), ("region", "Lagos"), ("intent", "refresh")])).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"<option value="Lagos" selected>"#));
    assert!(html.contains(r#"<option value="Lekki">"#));
    assert!(!html.contains(r#"<option value="Garki">"#));

    let response = send(
        &h.app,
        post(&[("form_id", &id), ("region", "Abuja"), ("locality", "Lekki"), ("intent", "refresh")]),
    )
    .await;
    let html = body_text(response).await;
    assert!(html.contains(r#"<option value="Garki">"#));
    assert!(!html.contains(r#"<option value="Lekki""#));
}

#[tokio::test]
async fn region_and_city_can_arrive_together() {
    let h = harness(3);
    let id = open_form(&h.app, "/auth/register").await;

    let response = send(
        &h.app,
        post(&[("form_id", &id), ("region", "Lagos"), ("locality", "Lekki"), ("intent", "refresh")]),
    )
    .await;
    let html = body_text(response).await;
    assert!(html.contains(r#"<option value="Lagos" selected>"#));
    assert!(html.contains(r#"<option value="Lekki" selected>"#));
}

#[tokio::test]
async fn one_shot_submit_on_a_fresh_form_registers() {
    let h = harness(0);
    let id = open_form(&h.app, "/auth/register").await;

    let response = send(&h.app, post(&complete(&id, "secret-1", "secret-1"))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        h.memory.calls(),
        CallCounts { create_account: 1, create_profile: 1, ..CallCounts::default() }
    );
}

#[tokio::test]
async fn role_toggle_keeps_other_fields() {
    let h = harness(3);
    let id = open_form(&h.app, "/auth/register").await;

    let response = send(
        &h.app,
        post(&[("form_id", &id), ("name", "Ada Obi"), ("intent", "role-technician")]),
    )
    .await;
    let html = body_text(response).await;
    assert!(html.contains(r#"name="skill""#));
    assert!(html.contains(r#"value="Ada Obi""#));
}

#[tokio::test]
async fn mismatched_passwords_are_reported_without_backend_calls() {
    let h = harness(3);
    let id = open_form(&h.app, "/auth/register").await;

    let response = send(&h.app, post(&complete(&id, "secret-1", "secret-2"))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("Passwords do not match."));
    assert_eq!(h.memory.calls(), CallCounts::default());
}

#[tokio::test]
async fn successful_submit_shows_confirmation_then_login() {
    let h = harness(3);
    let id = open_form(&h.app, "/auth/register").await;

    let response = send(&h.app, post(&complete(&id, "secret-1", "secret-1"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Registration successful! Please check your email to confirm."));
    assert!(html.contains(r#"content="3;url=/auth/login""#));

    assert_eq!(h.memory.profile_count(), 1);
}

#[tokio::test]
async fn zero_delay_redirects_straight_to_login() {
    let h = harness(0);
    let id = open_form(&h.app, "/auth/register").await;

    let response = send(&h.app, post(&complete(&id, "secret-1", "secret-1"))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/auth/login");
}

#[tokio::test]
async fn submitted_form_cannot_be_reused() {
    let h = harness(3);
    let id = open_form(&h.app, "/auth/register").await;
    send(&h.app, post(&complete(&id, "secret-1", "secret-1"))).await;

    let response = send(&h.app, post(&complete(&id, "secret-1", "secret-1"))).await;
    let html = body_text(response).await;
    assert!(html.contains("Your form expired, please fill it in again."));
    assert_eq!(h.memory.account_count(), 1);
}

#[tokio::test]
async fn unknown_form_id_starts_over() {
    let h = harness(3);
    let response = send(&h.app, post(&[("form_id", "gone"), ("intent", "refresh")])).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Your form expired, please fill it in again."));
    assert_ne!(form_id(&html), "gone");
}

#[tokio::test]
async fn provider_rejection_is_shown_verbatim() {
    let h = harness(3);
    h.memory.fail_next_signup("Signups not allowed for this instance");
    let id = open_form(&h.app, "/auth/register").await;

    let response = send(&h.app, post(&complete(&id, "secret-1", "secret-1"))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("Signups not allowed for this instance"));

    let response = send(&h.app, post(&complete(&id, "secret-1", "secret-1"))).await;
    assert_eq!(response.status(), StatusCode::OK, "form stays usable after a failure");
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_submits_register_once() {
    let h = harness_with(3, MemoryBackend::new().with_latency(Duration::from_millis(200)));
    let id = open_form(&h.app, "/auth/register").await;

    let (first, second) = tokio::join!(
        send(&h.app, post(&complete(&id, "secret-1", "secret-1"))),
        send(&h.app, post(&complete(&id, "secret-1", "secret-1"))),
    );

    let (accepted, rejected) =
        if first.status() == StatusCode::OK { (first, second) } else { (second, first) };
    assert_eq!(accepted.status(), StatusCode::OK);
    assert_eq!(rejected.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(rejected).await.contains("Your registration is already being submitted."));
    assert!(body_text(accepted).await.contains("Registration successful!"));

    assert_eq!(
        h.memory.calls(),
        CallCounts { create_account: 1, create_profile: 1, ..CallCounts::default() }
    );
}
