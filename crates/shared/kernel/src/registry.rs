//! Startup-time catalogue of constructible models.
//!
//! Registrations go into a mutable [`RegistryBuilder`] while the module starts up;
//! [`RegistryBuilder::build`] freezes them into a cheap-to-clone, read-only [`Registry`].

use crate::error::ResourceError;
use crate::resource::{
    Component, Dependencies, Instance, RawSettings, Resource, ResourceConfig, validate,
};
use fxhash::FxHashMap;
use modkit_domain::names::{Api, Model};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// Declares the API and model a component implements.
///
/// Usually generated by `#[modkit_derive::model(api = "...", model = "...")]`.
pub trait Modeled {
    const API: Api;
    const MODEL: Model;
}

type Constructor = dyn Fn(&Dependencies, &ResourceConfig) -> Result<Arc<dyn Resource>, ResourceError>
    + Send
    + Sync;

/// Checks raw settings and returns implicit dependency names.
pub type Validator = fn(&RawSettings, &str) -> Result<Vec<String>, ResourceError>;

/// How to validate and construct one model.
#[derive(Clone)]
pub struct Registration {
    constructor: Arc<Constructor>,
    validator: Validator,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration").finish_non_exhaustive()
    }
}

impl Registration {
    pub fn new<F>(constructor: F, validator: Validator) -> Self
    where
        F: Fn(&Dependencies, &ResourceConfig) -> Result<Arc<dyn Resource>, ResourceError>
            + Send
            + Sync
            + 'static,
    {
        Self { constructor: Arc::new(constructor), validator }
    }

    /// Registration for a [`Component`], managed by a generic [`Instance`].
    #[must_use]
    pub fn component<C: Component>() -> Self {
        Self::new(construct_instance::<C>, validate_attributes::<C>)
    }

    /// # Errors
    /// Whatever validation or the component's constructor reports.
    pub fn construct(
        &self,
        dependencies: &Dependencies,
        config: &ResourceConfig,
    ) -> Result<Arc<dyn Resource>, ResourceError> {
        (self.constructor)(dependencies, config)
    }

    /// # Errors
    /// [`ResourceError::Validation`] for unacceptable settings.
    pub fn validate(&self, raw: &RawSettings, path: &str) -> Result<Vec<String>, ResourceError> {
        (self.validator)(raw, path)
    }
}

fn construct_instance<C: Component>(
    dependencies: &Dependencies,
    config: &ResourceConfig,
) -> Result<Arc<dyn Resource>, ResourceError> {
    Ok(Arc::new(Instance::<C>::construct(dependencies, config)?))
}

fn validate_attributes<C: Component>(
    raw: &RawSettings,
    path: &str,
) -> Result<Vec<String>, ResourceError> {
    validate::<C::Config>(raw, path).map(|validated| validated.implicit_dependencies)
}

/// Collects registrations during startup.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: FxHashMap<(Api, Model), Registration>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `registration` under `(api, model)`.
    ///
    /// # Errors
    /// [`ResourceError::DuplicateRegistration`] if the pair is already taken; the
    /// existing registration is kept.
    pub fn register(
        &mut self,
        api: Api,
        model: Model,
        registration: Registration,
    ) -> Result<&mut Self, ResourceError> {
        let key = (api, model);
        if self.entries.contains_key(&key) {
            let (api, model) = key;
            error!(%api, %model, "Model registered twice");
            return Err(ResourceError::DuplicateRegistration { api, model, context: None });
        }

        debug!(api = %key.0, model = %key.1, "Model registered");
        self.entries.insert(key, registration);
        Ok(self)
    }

    /// Registers a component under its declared [`Modeled`] pair.
    ///
    /// # Errors
    /// [`ResourceError::DuplicateRegistration`] if the pair is already taken.
    pub fn register_component<C>(&mut self) -> Result<&mut Self, ResourceError>
    where
        C: Component + Modeled,
    {
        self.register(C::API, C::MODEL, Registration::component::<C>())
    }

    /// Freezes the registrations. No entry can be added afterwards.
    #[must_use]
    pub fn build(self) -> Registry {
        Registry { entries: Arc::new(self.entries) }
    }
}

/// Read-only view of every registered model.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Arc<FxHashMap<(Api, Model), Registration>>,
}

impl Registry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    #[must_use]
    pub fn lookup(&self, api: &Api, model: &Model) -> Option<&Registration> {
        self.entries.get(&(api.clone(), model.clone()))
    }

    /// # Errors
    /// [`ResourceError::UnknownModel`] if nothing is registered under the pair.
    pub fn require(&self, api: &Api, model: &Model) -> Result<&Registration, ResourceError> {
        self.lookup(api, model).ok_or_else(|| ResourceError::UnknownModel {
            api: api.clone(),
            model: model.clone(),
            context: None,
        })
    }

    /// Registered pairs in a stable order.
    #[must_use]
    pub fn models(&self) -> Vec<(&Api, &Model)> {
        let mut models: Vec<_> = self.entries.keys().map(|(api, model)| (api, model)).collect();
        models.sort_unstable();
        models
    }

    /// A registry serving only the `wanted` pairs.
    ///
    /// # Errors
    /// [`ResourceError::UnknownModel`] for the first pair that is not registered.
    pub fn select(&self, wanted: &[(Api, Model)]) -> Result<Self, ResourceError> {
        let mut builder = RegistryBuilder::new();
        for (api, model) in wanted {
            let registration = self.require(api, model)?.clone();
            builder.register(api.clone(), model.clone(), registration)?;
        }
        Ok(builder.build())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
