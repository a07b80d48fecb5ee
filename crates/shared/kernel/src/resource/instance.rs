use super::validate::{Validated, validate};
use super::{Component, Dependencies, Document, Resource, ResourceConfig};
use crate::error::ResourceError;
use modkit_domain::names::ResourceName;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug)]
enum Lifecycle<C> {
    Ready(Arc<C>),
    Closed,
}

/// A live component with an atomically swappable configuration snapshot.
///
/// Readers clone the current `Arc<C>` under a short read lock and then work on that
/// snapshot without holding any lock. Reconfiguration builds the next snapshot outside
/// the lock and publishes it with one pointer swap, so a call in flight finishes on the
/// snapshot it started with.
#[derive(Debug)]
pub struct Instance<C> {
    name: ResourceName,
    lifecycle: RwLock<Lifecycle<C>>,
}

impl<C: Component> Instance<C> {
    /// Validates `config`, checks its implicit dependencies and builds the first snapshot.
    ///
    /// # Errors
    /// Validation, dependency or component errors. Nothing is constructed on failure.
    pub fn construct(
        dependencies: &Dependencies,
        config: &ResourceConfig,
    ) -> Result<Self, ResourceError> {
        let name = config.resource_name();
        let state = build_state::<C>(&name, dependencies, config)?;
        debug!(resource = %name, model = %config.model, "Instance constructed");

        Ok(Self { name, lifecycle: RwLock::new(Lifecycle::Ready(Arc::new(state))) })
    }

    /// The snapshot currently published.
    ///
    /// # Errors
    /// [`ResourceError::InstanceClosed`] once closed.
    pub fn snapshot(&self) -> Result<Arc<C>, ResourceError> {
        match &*self.lifecycle.read() {
            Lifecycle::Ready(state) => Ok(Arc::clone(state)),
            Lifecycle::Closed => Err(ResourceError::closed(&self.name)),
        }
    }
}

impl<C: Component> Resource for Instance<C> {
    fn name(&self) -> &ResourceName {
        &self.name
    }

    fn reconfigure(
        &self,
        dependencies: &Dependencies,
        config: &ResourceConfig,
    ) -> Result<(), ResourceError> {
        self.snapshot()?;
        if config.name != self.name.name() || config.api != *self.name.api() {
            return Err(ResourceError::invalid(
                "name",
                &config.path(),
                format!("cannot rename live resource `{}`", self.name),
            ));
        }

        let next = build_state::<C>(&self.name, dependencies, config).inspect_err(|err| {
            warn!(resource = %self.name, error = %err, "Reconfiguration rejected");
        })?;

        match &mut *self.lifecycle.write() {
            Lifecycle::Ready(current) => *current = Arc::new(next),
            Lifecycle::Closed => return Err(ResourceError::closed(&self.name)),
        }

        info!(resource = %self.name, "Resource reconfigured");
        Ok(())
    }

    fn readings(&self, extra: &Document) -> Result<Document, ResourceError> {
        self.snapshot()?.readings(extra)
    }

    fn do_command(&self, command: &Document) -> Result<Document, ResourceError> {
        self.snapshot()?.do_command(command)
    }

    fn close(&self) -> Result<(), ResourceError> {
        let previous = std::mem::replace(&mut *self.lifecycle.write(), Lifecycle::Closed);
        match previous {
            Lifecycle::Ready(state) => {
                state.close()?;
                info!(resource = %self.name, "Resource closed");
            }
            Lifecycle::Closed => debug!(resource = %self.name, "Resource already closed"),
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        matches!(*self.lifecycle.read(), Lifecycle::Closed)
    }
}

fn build_state<C: Component>(
    name: &ResourceName,
    dependencies: &Dependencies,
    config: &ResourceConfig,
) -> Result<C, ResourceError> {
    let Validated { config: native, implicit_dependencies } =
        validate::<C::Config>(&config.attributes, &config.path())?;
    for dependency in implicit_dependencies.iter().chain(&config.depends_on) {
        dependencies.require(dependency)?;
    }
    C::build(name, native, dependencies)
}
