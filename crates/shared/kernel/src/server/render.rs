use crate::server::error::WebError;
use axum::response::{Html, IntoResponse, Redirect as SeeOther, Response};

/// Renders an askama template into an HTML response.
///
/// # Errors
/// [`WebError::Template`] if rendering fails.
pub fn render<T: askama::Template>(template: &T) -> Result<Html<String>, WebError> {
    Ok(Html(template.render()?))
}

/// `303 See Other` to `to`; the browser follows up with a GET.
pub fn redirect(to: &str) -> Response {
    SeeOther::to(to).into_response()
}
