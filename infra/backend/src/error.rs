use std::borrow::Cow;

/// Failures talking to the hosted backend.
#[handy_derive::handy_error]
pub enum BackendError {
    /// The provider answered with an explicit error; `message` is its text, verbatim.
    #[error("Backend rejected request{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The request never produced a usable HTTP response.
    #[error("Backend transport error{}: {source}", format_context(.context))]
    Transport { source: reqwest::Error, context: Option<Cow<'static, str>> },

    /// The response body was not what the protocol promises.
    #[error("Backend response malformed{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// Builder misconfiguration.
    #[error("Backend configuration error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal backend error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl BackendError {
    /// Text suitable for showing to the person filling in a form.
    ///
    /// Provider rejections are passed through untouched; anything else is
    /// reported by its display form without the internal context.
    #[must_use]
    pub fn user_message(&self) -> Cow<'_, str> {
        match self {
            Self::Rejected { message, .. } => Cow::Borrowed(message.as_ref()),
            Self::Transport { source, .. } => Cow::Owned(source.to_string()),
            Self::Decode { source, .. } => Cow::Owned(source.to_string()),
            Self::Validation { message, .. } | Self::Internal { message, .. } => {
                Cow::Borrowed(message.as_ref())
            },
        }
    }
}
