use handy_backend::BackendError;
use std::borrow::Cow;

#[handy_derive::handy_error]
pub enum DashboardError {
    /// The provider could not be asked whether the session is still valid.
    #[error("Dashboard backend error{}: {source}", format_context(.context))]
    Backend { source: BackendError, context: Option<Cow<'static, str>> },

    #[error("Internal dashboard error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
