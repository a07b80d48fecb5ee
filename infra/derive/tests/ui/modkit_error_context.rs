use modkit_derive::modkit_error;
use std::borrow::Cow;

#[modkit_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), std::io::Error> {
    Err(std::io::Error::other("disk"))
}

fn fails() -> Result<(), DemoError> {
    Err("logic".into())
}

fn main() {
    let err = read().context("Reading settings").unwrap_err();
    assert_eq!(err.to_string(), "IO error (Reading settings): disk");

    let err = fails().context("Validating").unwrap_err();
    assert_eq!(err.to_string(), "Internal error (Validating): logic");
}
