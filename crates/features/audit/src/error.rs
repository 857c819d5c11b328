use handy_event_bus::EventBusError;
use std::borrow::Cow;

/// Audit slice error type.
#[handy_derive::handy_error]
pub enum AuditError {
    #[error("Audit subscription failed{}: {source}", format_context(.context))]
    Subscribe { source: EventBusError, context: Option<Cow<'static, str>> },

    #[error("Audit error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
