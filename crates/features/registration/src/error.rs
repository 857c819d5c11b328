use crate::form::FormField;
use std::borrow::Cow;

/// Why a registration attempt did not complete.
///
/// The display text is what the person filling in the form sees.
#[handy_derive::handy_error]
pub enum RegistrationError {
    #[error("Passwords do not match.")]
    PasswordMismatch { context: Option<Cow<'static, str>> },

    #[error("Please tell us which skill you offer.")]
    SkillRequired { context: Option<Cow<'static, str>> },

    #[error("{} is required.", .field.label())]
    MissingField { field: FormField, context: Option<Cow<'static, str>> },

    #[error("Please choose a city from the list for {region}.")]
    UnknownLocality { region: String, context: Option<Cow<'static, str>> },

    /// The provider refused the account; its message is shown as is.
    #[error("{message}")]
    AuthFailure { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Accepted by the provider without a usable account id.
    #[error("Signup failed, please try again.")]
    SignupIncomplete { context: Option<Cow<'static, str>> },

    /// The account exists but its profile row could not be written.
    #[error("{message}")]
    ProfileWriteFailure { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Your registration is already being submitted.")]
    SubmissionInFlight { context: Option<Cow<'static, str>> },

    #[error("Something went wrong{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl RegistrationError {
    /// Stable name for logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PasswordMismatch { .. } => "password_mismatch",
            Self::SkillRequired { .. } => "skill_required",
            Self::MissingField { .. } => "missing_field",
            Self::UnknownLocality { .. } => "unknown_locality",
            Self::AuthFailure { .. } => "auth_failure",
            Self::SignupIncomplete { .. } => "signup_incomplete",
            Self::ProfileWriteFailure { .. } => "profile_write_failure",
            Self::SubmissionInFlight { .. } => "submission_in_flight",
            Self::Internal { .. } => "internal",
        }
    }

    /// Problems the user fixes by editing the form, detected before any remote call.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::PasswordMismatch { .. }
                | Self::SkillRequired { .. }
                | Self::MissingField { .. }
                | Self::UnknownLocality { .. }
        )
    }
}
