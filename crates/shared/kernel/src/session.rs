//! Host-facing dispatcher over the registry and the table of live resources.

use crate::error::ResourceError;
use crate::protocol::{HostRequest, ModelHandle, Outcome};
use crate::registry::Registry;
use crate::resource::{Dependencies, Document, Resource, ResourceConfig};
use fxhash::FxHashMap;
use modkit_domain::capabilities::Capabilities;
use modkit_domain::names::{Model, ResourceName};
use parking_lot::RwLock;
use serde_json::{Value, json};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug)]
struct Entry {
    model: Model,
    resource: Arc<dyn Resource>,
}

/// Lifecycle calls from the host, routed to live resources.
///
/// The resource table lock is held to look up, insert or remove entries, and shared
/// while a resource closes so a rebuild cannot slip past it. Other calls into resources
/// run without it, so independent requests proceed concurrently.
#[derive(Debug)]
pub struct Session {
    registry: Registry,
    resources: RwLock<FxHashMap<ResourceName, Entry>>,
}

impl Session {
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self { registry, resources: RwLock::new(FxHashMap::default()) }
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Dispatches one request and converts its result for the wire.
    pub fn handle(&self, request: HostRequest) -> Outcome {
        let method = request.method();
        let result = match request {
            HostRequest::Ready => Ok(json!({ "models": self.ready() })),
            HostRequest::ValidateConfig { config } => self
                .validate_config(&config)
                .map(|implicit| json!({ "implicit_dependencies": implicit })),
            HostRequest::AddResource { config, dependencies } => {
                self.add_resource(&config, &dependencies).map(|()| empty())
            }
            HostRequest::ReconfigureResource { config, dependencies } => {
                self.reconfigure_resource(&config, &dependencies).map(|()| empty())
            }
            HostRequest::Readings { name, extra } => self.readings(&name, &extra).map(Value::Object),
            HostRequest::DoCommand { name, command } => {
                self.do_command(&name, &command).map(Value::Object)
            }
            HostRequest::Close { name } => self.close(&name).map(|()| empty()),
            HostRequest::RemoveResource { name } => self.remove_resource(&name).map(|()| empty()),
        };

        if let Err(err) = &result {
            debug!(method, error = %err, "Host request failed");
        }
        result.into()
    }

    /// Models this session can construct.
    #[must_use]
    pub fn ready(&self) -> Vec<ModelHandle> {
        self.registry
            .models()
            .into_iter()
            .map(|(api, model)| ModelHandle::new(api.clone(), model.clone()))
            .collect()
    }

    /// Validates settings without touching any live resource.
    ///
    /// # Errors
    /// [`ResourceError::UnknownModel`] or [`ResourceError::Validation`].
    pub fn validate_config(&self, config: &ResourceConfig) -> Result<Vec<String>, ResourceError> {
        let registration = self.registry.require(&config.api, &config.model)?;
        registration.validate(&config.attributes, &config.path())
    }

    /// Constructs and starts tracking a new resource.
    ///
    /// # Errors
    /// [`ResourceError::AlreadyExists`], [`ResourceError::UnknownModel`], a dependency
    /// error, or whatever construction reports.
    pub fn add_resource(
        &self,
        config: &ResourceConfig,
        dependencies: &[String],
    ) -> Result<(), ResourceError> {
        let name = config.resource_name();
        if self.resources.read().contains_key(&name) {
            return Err(ResourceError::AlreadyExists { name, context: None });
        }

        let registration = self.registry.require(&config.api, &config.model)?;
        let resolved = self.resolve(dependencies, config)?;
        let resource = registration.construct(&resolved, config)?;

        let mut resources = self.resources.write();
        if resources.contains_key(&name) {
            drop(resources);
            release(&resource);
            return Err(ResourceError::AlreadyExists { name, context: None });
        }
        resources.insert(name.clone(), Entry { model: config.model.clone(), resource });
        drop(resources);

        info!(resource = %name, model = %config.model, "Resource added");
        Ok(())
    }

    /// Applies new settings to a live resource.
    ///
    /// A model change rebuilds the resource from the registry and closes the old one.
    ///
    /// # Errors
    /// [`ResourceError::NotFound`], a validation or dependency error (the previous
    /// settings stay in effect), or [`ResourceError::InstanceClosed`].
    pub fn reconfigure_resource(
        &self,
        config: &ResourceConfig,
        dependencies: &[String],
    ) -> Result<(), ResourceError> {
        let name = config.resource_name();
        let (model, current) = {
            let resources = self.resources.read();
            let entry = resources.get(&name).ok_or_else(|| not_found(&name))?;
            (entry.model.clone(), Arc::clone(&entry.resource))
        };
        let resolved = self.resolve(dependencies, config)?;

        if model == config.model {
            return current.reconfigure(&resolved, config);
        }

        let registration = self.registry.require(&config.api, &config.model)?;
        if current.is_closed() {
            return Err(ResourceError::closed(&name));
        }
        let replacement = registration.construct(&resolved, config)?;

        let mut resources = self.resources.write();
        let swapped = match resources.get(&name) {
            None => Err(not_found(&name)),
            Some(entry) if !Arc::ptr_eq(&entry.resource, &current) || current.is_closed() => {
                Err(ResourceError::closed(&name))
            }
            Some(_) => Ok(()),
        };
        if let Err(err) = swapped {
            drop(resources);
            release(&replacement);
            return Err(err);
        }
        resources.insert(name.clone(), Entry { model: config.model.clone(), resource: replacement });
        drop(resources);
        release(&current);

        info!(resource = %name, from = %model, to = %config.model, "Resource rebuilt for new model");
        Ok(())
    }

    /// # Errors
    /// [`ResourceError::NotFound`], [`ResourceError::Unimplemented`] for APIs without
    /// readings, or whatever the resource reports.
    pub fn readings(
        &self,
        name: &ResourceName,
        extra: &Document,
    ) -> Result<Document, ResourceError> {
        let resource = self.get(name)?;
        if !Capabilities::of(name.api()).contains(Capabilities::READINGS) {
            return Err(ResourceError::unimplemented(format!("`{}` has no readings", name.api())));
        }
        resource.readings(extra)
    }

    /// # Errors
    /// [`ResourceError::NotFound`] or whatever the resource reports.
    pub fn do_command(
        &self,
        name: &ResourceName,
        command: &Document,
    ) -> Result<Document, ResourceError> {
        self.get(name)?.do_command(command)
    }

    /// Closes a resource but keeps it addressable; later calls report it closed.
    ///
    /// # Errors
    /// [`ResourceError::NotFound`] or whatever the resource reports while closing.
    pub fn close(&self, name: &ResourceName) -> Result<(), ResourceError> {
        let resources = self.resources.read();
        resources.get(name).ok_or_else(|| not_found(name))?.resource.close()
    }

    /// Closes a resource and stops tracking it.
    ///
    /// # Errors
    /// [`ResourceError::NotFound`] or whatever the resource reports while closing.
    pub fn remove_resource(&self, name: &ResourceName) -> Result<(), ResourceError> {
        let entry = self.resources.write().remove(name).ok_or_else(|| not_found(name))?;
        info!(resource = %name, "Resource removed");
        entry.resource.close()
    }

    /// Closes every tracked resource and returns how many there were.
    pub fn shutdown(&self) -> usize {
        let drained = std::mem::take(&mut *self.resources.write());
        let count = drained.len();
        if count > 0 {
            info!(count, "Closing resources");
        }
        for entry in drained.into_values() {
            release(&entry.resource);
        }
        count
    }

    /// A live resource by name.
    ///
    /// # Errors
    /// [`ResourceError::NotFound`].
    pub fn get(&self, name: &ResourceName) -> Result<Arc<dyn Resource>, ResourceError> {
        self.resources
            .read()
            .get(name)
            .map(|entry| Arc::clone(&entry.resource))
            .ok_or_else(|| not_found(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }

    /// Resolves host-supplied and declared dependency names against the live table.
    fn resolve(
        &self,
        names: &[String],
        config: &ResourceConfig,
    ) -> Result<Dependencies, ResourceError> {
        let resources = self.resources.read();
        let mut resolved = Dependencies::new();
        for name in names.iter().chain(&config.depends_on) {
            let found = match name.parse::<ResourceName>() {
                Ok(full) => resources.get(&full),
                Err(_) => resources
                    .iter()
                    .find(|(key, _)| key.name() == name.as_str())
                    .map(|(_, entry)| entry),
            };
            let entry = found.ok_or_else(|| ResourceError::MissingDependency {
                name: name.clone(),
                context: Some(Cow::Owned(format!("required by `{}`", config.resource_name()))),
            })?;
            resolved.insert(Arc::clone(&entry.resource));
        }
        Ok(resolved)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn not_found(name: &ResourceName) -> ResourceError {
    ResourceError::NotFound { name: name.to_string(), context: None }
}

fn empty() -> Value {
    Value::Object(Document::new())
}

fn release(resource: &Arc<dyn Resource>) {
    if let Err(err) = resource.close() {
        warn!(resource = %resource.name(), error = %err, "Failed to close resource");
    }
}
