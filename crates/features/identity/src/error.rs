use std::borrow::Cow;

/// Why a sign-in did not produce a session.
#[handy_derive::handy_error]
pub enum IdentityError {
    /// The provider refused the credentials; its message is shown as is.
    #[error("{message}")]
    AuthFailure { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal identity error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_is_the_display_text() {
        let err = IdentityError::AuthFailure {
            message: "Invalid login credentials".into(),
            context: Some("sign_in".into()),
        };
        assert_eq!(err.to_string(), "Invalid login credentials");
    }

    #[test]
    fn internal_errors_convert_from_strings() {
        let err: IdentityError = "no backend".into();
        assert!(matches!(err, IdentityError::Internal { .. }));
    }
}
