//! Resource contract between the host session and component implementations.
//!
//! A component author implements [`Component`]: a native configuration type plus the
//! immutable state derived from it. The kernel wraps it in an [`Instance`], which owns the
//! lifecycle (construct, reconfigure by snapshot swap, close) and exposes it to the host
//! through the object-safe [`Resource`] trait.

pub mod config;
pub mod instance;
pub mod validate;

pub use config::ResourceConfig;
pub use instance::Instance;
pub use validate::{Validate, Validated, validate};

use crate::error::ResourceError;
use fxhash::FxHashMap;
use modkit_domain::names::ResourceName;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;

/// A JSON object exchanged with the host: readings, commands and their replies.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Untyped settings as delivered by the host, before validation.
pub type RawSettings = Document;

/// A live resource as seen by the host session.
///
/// Calls may arrive concurrently from independent host requests.
pub trait Resource: fmt::Debug + Send + Sync {
    fn name(&self) -> &ResourceName;

    /// Replaces the configuration of a live resource.
    ///
    /// # Errors
    /// [`ResourceError::Validation`] or a dependency error leaves the previous
    /// configuration in place. [`ResourceError::InstanceClosed`] once closed.
    fn reconfigure(
        &self,
        dependencies: &Dependencies,
        config: &ResourceConfig,
    ) -> Result<(), ResourceError>;

    /// # Errors
    /// [`ResourceError::InstanceClosed`] once closed, or whatever the component reports.
    fn readings(&self, extra: &Document) -> Result<Document, ResourceError>;

    /// # Errors
    /// [`ResourceError::Unimplemented`] unless the component handles commands.
    fn do_command(&self, command: &Document) -> Result<Document, ResourceError>;

    /// Releases the resource. Repeated calls succeed without effect.
    ///
    /// # Errors
    /// Whatever the component reports while releasing its state.
    fn close(&self) -> Result<(), ResourceError>;

    /// Whether [`Resource::close`] has run. Closed is final.
    fn is_closed(&self) -> bool;
}

/// A constructible component: the immutable snapshot of one validated configuration.
///
/// Each reconfiguration builds a fresh value of `Self`; readers always observe
/// one complete snapshot, never a mix of two.
pub trait Component: fmt::Debug + Send + Sync + Sized + 'static {
    /// Native configuration, deserialized from the host's raw settings.
    type Config: DeserializeOwned + Validate + Send;

    /// Derives the component state from an already validated configuration.
    ///
    /// # Errors
    /// Any error aborts construction or reconfiguration without side effects.
    fn build(
        name: &ResourceName,
        config: Self::Config,
        dependencies: &Dependencies,
    ) -> Result<Self, ResourceError>;

    /// # Errors
    /// Component specific.
    fn readings(&self, extra: &Document) -> Result<Document, ResourceError>;

    /// # Errors
    /// [`ResourceError::Unimplemented`] by default.
    fn do_command(&self, command: &Document) -> Result<Document, ResourceError> {
        let _ = command;
        Err(ResourceError::unimplemented("do_command is not supported by this model"))
    }

    /// Called once when the instance is closed.
    ///
    /// # Errors
    /// Component specific.
    fn close(&self) -> Result<(), ResourceError> {
        Ok(())
    }
}

/// Resources resolved by the host and injected at construction or reconfiguration.
#[derive(Debug, Clone, Default)]
pub struct Dependencies {
    resolved: FxHashMap<ResourceName, Arc<dyn Resource>>,
}

impl Dependencies {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resource: Arc<dyn Resource>) {
        self.resolved.insert(resource.name().clone(), resource);
    }

    #[must_use]
    pub fn get(&self, name: &ResourceName) -> Option<&Arc<dyn Resource>> {
        self.resolved.get(name)
    }

    /// Looks a dependency up by full name (`api/name`) or by its short name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Arc<dyn Resource>> {
        if let Ok(full) = name.parse::<ResourceName>() {
            return self.resolved.get(&full);
        }
        self.resolved.iter().find(|(key, _)| key.name() == name).map(|(_, resource)| resource)
    }

    /// # Errors
    /// [`ResourceError::MissingDependency`] if `name` was not injected.
    pub fn require(&self, name: &str) -> Result<&Arc<dyn Resource>, ResourceError> {
        self.find(name)
            .ok_or_else(|| ResourceError::MissingDependency { name: name.to_owned(), context: None })
    }

    pub fn names(&self) -> impl Iterator<Item = &ResourceName> {
        self.resolved.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

impl FromIterator<Arc<dyn Resource>> for Dependencies {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Resource>>>(iter: I) -> Self {
        let mut dependencies = Self::new();
        for resource in iter {
            dependencies.insert(resource);
        }
        dependencies
    }
}
