use super::{Document, RawSettings};
use modkit_domain::constants::{COMPONENT, SERVICE};
use modkit_domain::names::{Api, Model, ResourceName};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One resource entry of the host's machine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceConfig {
    pub name: String,
    pub api: Api,
    pub model: Model,
    #[serde(default)]
    pub attributes: RawSettings,
    /// Explicit dependencies declared by the operator.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl ResourceConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, api: Api, model: Model) -> Self {
        Self {
            name: name.into(),
            api,
            model,
            attributes: Document::new(),
            depends_on: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: RawSettings) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.depends_on.push(name.into());
        self
    }

    #[must_use]
    pub fn resource_name(&self) -> ResourceName {
        ResourceName::new(self.api.clone(), self.name.as_str())
    }

    /// Location of this entry in the machine configuration, used in validation errors.
    #[must_use]
    pub fn path(&self) -> String {
        let section = match self.api.kind() {
            COMPONENT => "components",
            SERVICE => "services",
            other => other,
        };
        format!("{section}.{}", self.name)
    }
}
