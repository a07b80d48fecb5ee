//! `viam-soleng:sensor:mysensor`: a sensor whose readings echo its configured `setting`.
//!
//! ```rust
//! use modkit_kernel::prelude::*;
//! use serde_json::json;
//!
//! let mut builder = Registry::builder();
//! modkit_sensor::register(&mut builder)?;
//! let session = Session::new(builder.build());
//!
//! let config = ResourceConfig::new("front", modkit_sensor::MySensor::API, modkit_sensor::MySensor::MODEL)
//!     .with_attribute("setting", 5);
//! session.add_resource(&config, &[])?;
//!
//! let readings = session.readings(&config.resource_name(), &Document::new())?;
//! assert_eq!(readings["setting"], json!(5));
//! # Ok::<(), ResourceError>(())
//! ```

mod config;

pub use config::Config;

use modkit_kernel::prelude::*;
use serde_json::Value;
use tracing::debug;

#[modkit_derive::model(api = "rdk:component:sensor", model = "viam-soleng:sensor:mysensor")]
#[derive(Debug)]
pub struct MySensor {
    config: Config,
    readings: Document,
}

impl MySensor {
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }
}

impl Component for MySensor {
    type Config = Config;

    fn build(
        name: &ResourceName,
        config: Config,
        _dependencies: &Dependencies,
    ) -> Result<Self, ResourceError> {
        let mut readings = Document::new();
        readings.insert("hello".to_owned(), Value::from("world"));
        readings.insert("setting".to_owned(), Value::from(config.setting));
        debug!(resource = %name, setting = config.setting, "Sensor state derived");

        Ok(Self { config, readings })
    }

    fn readings(&self, _extra: &Document) -> Result<Document, ResourceError> {
        Ok(self.readings.clone())
    }
}

/// Registers every model of this crate.
///
/// # Errors
/// [`ResourceError::DuplicateRegistration`] if a model is already registered.
pub fn register(builder: &mut RegistryBuilder) -> Result<(), ResourceError> {
    builder.register_component::<MySensor>()?;
    Ok(())
}
