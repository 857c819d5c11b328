use handy_derive::handy_error;
use std::borrow::Cow;

#[handy_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Rejected{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let from_io: DemoError = std::io::Error::other("disk").into();
    assert!(matches!(from_io, DemoError::Io { context: None, .. }));

    let internal: DemoError = "boom".into();
    assert_eq!(internal.to_string(), "Internal error: boom");

    let owned: DemoError = String::from("bang").into();
    assert!(matches!(owned, DemoError::Internal { .. }));
}
