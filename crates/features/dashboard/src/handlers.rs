use crate::Dashboard;
use crate::catalog::SlideIndex;
use crate::view::{DashboardPage, LandingPage};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use handy_derive::api_handler;
use handy_kernel::prelude::*;
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::IntoParams;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// `/` and `/dashboard`.
pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(landing)).routes(routes!(dashboard))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct DashboardQuery {
    /// Slide to show; any integer, wrapped onto the slideshow
    slide: Option<String>,
}

impl DashboardQuery {
    fn slide(&self) -> SlideIndex {
        let requested = self.slide.as_deref().and_then(|raw| raw.trim().parse().ok());
        SlideIndex::wrap(requested.unwrap_or(0))
    }
}

#[api_handler(
    get,
    path = "/",
    responses((status = OK, description = "Landing page", content_type = "text/html", body = String)),
    tag = PAGES_TAG,
)]
pub(crate) async fn landing() -> Result<Response, WebError> {
    Ok(render(&LandingPage::default())?.into_response())
}

#[api_handler(
    get,
    path = "/dashboard",
    params(DashboardQuery),
    responses(
        (status = OK, description = "Dashboard for the signed-in account", content_type = "text/html", body = String),
        (status = SEE_OTHER, description = "Not signed in; continue to login"),
    ),
    tag = PAGES_TAG,
)]
pub(crate) async fn dashboard(
    State(state): State<AppState>,
    current: CurrentSession,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, WebError> {
    let slice = state.try_get_slice::<Dashboard>()?;
    let (Some(id), Some(session)) = (current.id.as_deref(), current.session.as_ref()) else {
        return Ok(to_login(&state, current.id.as_deref()));
    };

    let viewer = match slice.viewers.resolve(session).await {
        Ok(Some(viewer)) => viewer,
        Ok(None) => return Ok(to_login(&state, Some(id))),
        Err(err) => {
            warn!(error = %err, "Could not confirm session");
            return Ok(to_login(&state, Some(id)));
        },
    };

    let profile = viewer.profile.as_ref();
    let page = DashboardPage::new(
        viewer.initial(),
        profile.and_then(|p| p.full_name.as_deref()),
        profile.map(|p| p.role),
        query.slide(),
    );
    Ok(render(&page)?.into_response())
}

/// Drops whatever session the cookie named and sends the browser to login.
fn to_login(state: &AppState, session_id: Option<&str>) -> Response {
    match session_id {
        Some(id) => {
            state.sessions.remove(id);
            info!("Dashboard visit without a valid session");
            (state.sessions.clear_cookie_headers(), redirect(LOGIN_PATH)).into_response()
        },
        None => redirect(LOGIN_PATH),
    }
}
