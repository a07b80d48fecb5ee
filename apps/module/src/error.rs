use modkit::kernel::config::ConfigError;
use modkit::kernel::error::ResourceError;
use std::borrow::Cow;

#[modkit_derive::modkit_error]
pub enum ModuleError {
    /// The host connection could not be established; nothing was served.
    #[error("Session start failed{}: {message}", format_context(.context))]
    SessionStart { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Resource error{}: {source}", format_context(.context))]
    Resource { source: ResourceError, context: Option<Cow<'static, str>> },

    #[error("Configuration error{}: {source}", format_context(.context))]
    Config { source: ConfigError, context: Option<Cow<'static, str>> },

    #[error("Codec error{}: {source}", format_context(.context))]
    Codec { source: serde_json::Error, context: Option<Cow<'static, str>> },
}

impl ModuleError {
    pub(crate) fn session_start(message: impl Into<Cow<'static, str>>) -> Self {
        Self::SessionStart { message: message.into(), context: None }
    }
}
