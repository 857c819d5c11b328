use handy_derive::handy_error;
use std::borrow::Cow;

#[handy_error]
pub enum LookupError {
    #[error("Parse error{}: {source}", format_context(.context))]
    Parse { source: std::num::ParseIntError, context: Option<Cow<'static, str>> },

    #[error("Missing{}: {message}", format_context(.context))]
    Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<u32, LookupError> {
    raw.parse::<u32>().context("reading slide index")
}

fn missing() -> Result<(), LookupError> {
    Err(LookupError::Missing { message: "no such region".into(), context: None })
}

fn main() {
    let err = parse("abc").unwrap_err();
    assert!(err.to_string().starts_with("Parse error (reading slide index): "));

    let err = missing().context("Lagos").unwrap_err();
    assert_eq!(err.to_string(), "Missing (Lagos): no such region");
}
