use crate::Identity;
use crate::view::LoginPage;
use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use handy_derive::api_handler;
use handy_kernel::prelude::*;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// `/auth/login` and `/auth/logout`.
pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(show_login, login)).routes(routes!(logout))
}

/// Posted credentials.
#[derive(Default, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct LoginInput {
    email: String,
    password: String,
}

#[api_handler(
    get,
    path = "/auth/login",
    responses(
        (status = OK, description = "Login form", content_type = "text/html", body = String),
        (status = SEE_OTHER, description = "Already signed in; continue to the dashboard"),
    ),
    tag = AUTH_TAG,
)]
pub(crate) async fn show_login(current: CurrentSession) -> Result<Response, WebError> {
    if current.session.is_some() {
        return Ok(redirect(DASHBOARD_PATH));
    }
    Ok(render(&LoginPage::new(""))?.into_response())
}

#[api_handler(
    post,
    path = "/auth/login",
    request_body(content = LoginInput, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = SEE_OTHER, description = "Signed in; session cookie set"),
        (status = UNAUTHORIZED, description = "Rejected; form shown with the provider message", content_type = "text/html", body = String),
    ),
    tag = AUTH_TAG,
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    current: CurrentSession,
    Form(input): Form<LoginInput>,
) -> Result<Response, WebError> {
    let slice = state.try_get_slice::<Identity>()?;

    match slice.authenticator.login(&input.email, &input.password).await {
        Ok(session) => {
            if let Some(previous) = current.id.as_deref() {
                state.sessions.remove(previous);
            }
            let id = state.sessions.insert(session);
            Ok((state.sessions.set_cookie_headers(&id), redirect(DASHBOARD_PATH)).into_response())
        },
        Err(err) => {
            let message = err.to_string();
            let page = LoginPage::new(&input.email).with_error(&message);
            Ok((StatusCode::UNAUTHORIZED, render(&page)?).into_response())
        },
    }
}

#[api_handler(
    post,
    path = "/auth/logout",
    responses((status = SEE_OTHER, description = "Session dropped; back to the landing page")),
    tag = AUTH_TAG,
)]
pub(crate) async fn logout(State(sessions): State<SessionStore>, current: CurrentSession) -> Response {
    if let Some(id) = current.id.as_deref() {
        sessions.remove(id);
        info!("Signed out");
    }
    (sessions.clear_cookie_headers(), redirect(HOME_PATH)).into_response()
}
