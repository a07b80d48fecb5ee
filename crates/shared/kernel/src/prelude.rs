pub use crate::domain::capabilities::Capabilities;
pub use crate::domain::names::{Api, Model, ResourceName};
pub use crate::error::{ErrorKind, ResourceError, ResourceErrorExt};
pub use crate::registry::{Modeled, Registration, Registry, RegistryBuilder};
pub use crate::resource::validate::integer;
pub use crate::resource::{
    Component, Dependencies, Document, Instance, RawSettings, Resource, ResourceConfig, Validate,
    Validated, validate,
};
pub use crate::session::Session;
