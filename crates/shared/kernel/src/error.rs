use modkit_domain::names::{Api, Model, ResourceName};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Errors surfaced by validation, the registry and live instances.
#[modkit_derive::modkit_error]
pub enum ResourceError {
    /// A settings field is missing, malformed or out of range.
    #[error("Invalid attribute `{field}` at `{path}`{}: {message}", format_context(.context))]
    Validation {
        field: Cow<'static, str>,
        path: String,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// The instance has been closed; only a repeated close is still accepted.
    #[error("Resource `{name}` is closed{}", format_context(.context))]
    InstanceClosed { name: ResourceName, context: Option<Cow<'static, str>> },

    /// The resource does not implement the requested call.
    #[error("Unimplemented{}: {message}", format_context(.context))]
    Unimplemented { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The same (API, model) pair was registered twice during startup.
    #[error("Model `{model}` is already registered for `{api}`{}", format_context(.context))]
    DuplicateRegistration { api: Api, model: Model, context: Option<Cow<'static, str>> },

    #[error("No registration for model `{model}` of `{api}`{}", format_context(.context))]
    UnknownModel { api: Api, model: Model, context: Option<Cow<'static, str>> },

    #[error("Dependency `{name}` could not be resolved{}", format_context(.context))]
    MissingDependency { name: String, context: Option<Cow<'static, str>> },

    #[error("Resource `{name}` not found{}", format_context(.context))]
    NotFound { name: String, context: Option<Cow<'static, str>> },

    #[error("Resource `{name}` already exists{}", format_context(.context))]
    AlreadyExists { name: ResourceName, context: Option<Cow<'static, str>> },

    /// Internal fallback for logic errors.
    #[error("Internal resource error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Wire-level classification of a failed host call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    InstanceClosed,
    Unimplemented,
    DuplicateRegistration,
    UnknownModel,
    MissingDependency,
    NotFound,
    AlreadyExists,
    MalformedRequest,
    Internal,
}

impl ResourceError {
    /// A validation failure for `field` at the configuration `path`.
    pub fn invalid(
        field: impl Into<Cow<'static, str>>,
        path: &str,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            path: path.to_owned(),
            message: message.into(),
            context: None,
        }
    }

    pub fn unimplemented(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Unimplemented { message: message.into(), context: None }
    }

    #[must_use]
    pub fn closed(name: &ResourceName) -> Self {
        Self::InstanceClosed { name: name.clone(), context: None }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::InstanceClosed { .. } => ErrorKind::InstanceClosed,
            Self::Unimplemented { .. } => ErrorKind::Unimplemented,
            Self::DuplicateRegistration { .. } => ErrorKind::DuplicateRegistration,
            Self::UnknownModel { .. } => ErrorKind::UnknownModel,
            Self::MissingDependency { .. } => ErrorKind::MissingDependency,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }
}
