use crate::server::state::AppStateError;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use handy_backend::BackendError;
use std::borrow::Cow;
use tracing::error;

/// Failures that end a request with an error page.
///
/// Expected outcomes (wrong password, taken email) are rendered by the slices
/// themselves; this type only covers what the user cannot fix.
#[handy_derive::handy_error]
pub enum WebError {
    #[error("Template rendering failed{}: {source}", format_context(.context))]
    Template { source: askama::Error, context: Option<Cow<'static, str>> },

    #[error("Backend unavailable{}: {source}", format_context(.context))]
    Backend { source: BackendError, context: Option<Cow<'static, str>> },

    #[error("Application state incomplete{}: {source}", format_context(.context))]
    State { source: AppStateError, context: Option<Cow<'static, str>> },

    #[error("Internal server error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl WebError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Backend { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        error!(error = %self, status = status.as_u16(), "Request failed");

        let body = format!(
            "<!doctype html><html><head><title>{code}</title><link rel=\"stylesheet\" href=\"/styles.css\"></head>\
             <body class=\"error-page\"><h1>{code}</h1><p>Something went wrong. Please try again.</p>\
             <a href=\"/\">Back to home</a></body></html>",
            code = status.as_u16()
        );
        (status, Html(body)).into_response()
    }
}
