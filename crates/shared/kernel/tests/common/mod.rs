#![allow(dead_code)]

use modkit_kernel::prelude::*;
use serde::Deserialize;
use serde_json::{Value, json};

pub const GAUGE_MODEL: &str = "acme:test:gauge";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GaugeConfig {
    #[serde(deserialize_with = "integer")]
    pub level: i64,
    #[serde(default)]
    pub source: Option<String>,
}

impl Validate for GaugeConfig {
    fn validate(&self, path: &str) -> Result<Vec<String>, ResourceError> {
        if self.level <= 0 {
            return Err(ResourceError::invalid("level", path, "must be greater than zero"));
        }
        Ok(self.source.iter().cloned().collect())
    }
}

/// Readings carry two fields derived from the same setting so torn snapshots are detectable.
#[modkit_derive::model(api = "rdk:component:sensor", model = "acme:test:gauge")]
#[derive(Debug)]
pub struct Gauge {
    level: i64,
    doubled: i64,
}

impl Component for Gauge {
    type Config = GaugeConfig;

    fn build(
        _name: &ResourceName,
        config: GaugeConfig,
        _dependencies: &Dependencies,
    ) -> Result<Self, ResourceError> {
        Ok(Self { level: config.level, doubled: config.level * 2 })
    }

    fn readings(&self, _extra: &Document) -> Result<Document, ResourceError> {
        Ok(document(json!({ "level": self.level, "doubled": self.doubled })))
    }

    fn do_command(&self, command: &Document) -> Result<Document, ResourceError> {
        Ok(document(json!({ "echo": command })))
    }
}

/// Same settings, served under the generic API and without `do_command`.
#[modkit_derive::model(api = "rdk:component:generic", model = "acme:test:knob")]
#[derive(Debug)]
pub struct Knob;

impl Component for Knob {
    type Config = GaugeConfig;

    fn build(
        _name: &ResourceName,
        _config: GaugeConfig,
        _dependencies: &Dependencies,
    ) -> Result<Self, ResourceError> {
        Ok(Self)
    }

    fn readings(&self, _extra: &Document) -> Result<Document, ResourceError> {
        Ok(Document::new())
    }
}

pub fn document(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

pub fn registry() -> Registry {
    let mut builder = Registry::builder();
    builder.register_component::<Gauge>().unwrap().register_component::<Knob>().unwrap();
    builder.build()
}

pub fn gauge(name: &str, level: i64) -> ResourceConfig {
    ResourceConfig::new(name, Api::SENSOR, GAUGE_MODEL.parse().unwrap())
        .with_attribute("level", level)
}

pub fn sensor(name: &str) -> ResourceName {
    ResourceName::new(Api::SENSOR, name)
}
