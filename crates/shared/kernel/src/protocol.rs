//! Messages exchanged with the host, independent of the transport carrying them.
//!
//! A request is wrapped in an [`Envelope`] whose `id` is echoed in the [`Reply`]:
//!
//! ```json
//! {"id": 7, "request": {"method": "readings", "params": {"name": "rdk:component:sensor/front"}}}
//! {"id": 7, "outcome": {"ok": {"hello": "world", "setting": 3}}}
//! ```

use crate::error::{ErrorKind, ResourceError};
use crate::resource::{Document, ResourceConfig};
use modkit_domain::capabilities::Capabilities;
use modkit_domain::names::{Api, Model, ResourceName};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub id: u64,
    pub request: HostRequest,
}

/// A lifecycle call issued by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "snake_case")]
pub enum HostRequest {
    /// Handshake; answered with the served models.
    Ready,
    ValidateConfig {
        config: ResourceConfig,
    },
    AddResource {
        config: ResourceConfig,
        #[serde(default)]
        dependencies: Vec<String>,
    },
    ReconfigureResource {
        config: ResourceConfig,
        #[serde(default)]
        dependencies: Vec<String>,
    },
    Readings {
        name: ResourceName,
        #[serde(default)]
        extra: Document,
    },
    DoCommand {
        name: ResourceName,
        #[serde(default)]
        command: Document,
    },
    /// Closes the instance but keeps it addressable.
    Close {
        name: ResourceName,
    },
    /// Closes the instance and forgets it.
    RemoveResource {
        name: ResourceName,
    },
}

impl HostRequest {
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::ValidateConfig { .. } => "validate_config",
            Self::AddResource { .. } => "add_resource",
            Self::ReconfigureResource { .. } => "reconfigure_resource",
            Self::Readings { .. } => "readings",
            Self::DoCommand { .. } => "do_command",
            Self::Close { .. } => "close",
            Self::RemoveResource { .. } => "remove_resource",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub id: u64,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ok(Value),
    Error(ErrorBody),
}

impl Outcome {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

impl From<Result<Value, ResourceError>> for Outcome {
    fn from(result: Result<Value, ResourceError>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(err) => Self::Error(err.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorBody {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

impl From<ResourceError> for ErrorBody {
    fn from(err: ResourceError) -> Self {
        Self { kind: err.kind(), message: err.to_string() }
    }
}

/// One model announced to the host during the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelHandle {
    pub api: Api,
    pub model: Model,
    pub capabilities: Capabilities,
}

impl ModelHandle {
    #[must_use]
    pub fn new(api: Api, model: Model) -> Self {
        let capabilities = Capabilities::of(&api);
        Self { api, model, capabilities }
    }
}
