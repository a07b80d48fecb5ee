use modkit_derive::modkit_error;
use std::borrow::Cow;

#[modkit_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Closed: {name}")]
    Closed { name: String },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let from_io: DemoError = std::io::Error::other("boom").into();
    assert!(matches!(from_io, DemoError::Io { context: None, .. }));

    let from_str: DemoError = "broken".into();
    assert_eq!(from_str.to_string(), "Internal error: broken");

    let closed = DemoError::Closed { name: "front".to_owned() };
    assert_eq!(closed.to_string(), "Closed: front");
}
