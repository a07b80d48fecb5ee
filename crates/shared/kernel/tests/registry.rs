mod common;

use common::{Gauge, Knob, gauge};
use modkit_kernel::prelude::*;

#[test]
fn test_duplicate_registration_is_rejected() {
    let mut builder = Registry::builder();
    builder.register_component::<Gauge>().unwrap();

    let err = builder.register_component::<Gauge>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateRegistration);

    let registry = builder.build();
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_lookup_finds_registered_model() {
    let registry = common::registry();
    assert!(registry.lookup(&Gauge::API, &Gauge::MODEL).is_some());
    assert!(registry.lookup(&Api::GENERIC, &Gauge::MODEL).is_none());
}

#[test]
fn test_unknown_model_is_reported() {
    let registry = common::registry();
    let model: Model = "acme:test:missing".parse().unwrap();
    let err = registry.require(&Api::SENSOR, &model).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownModel);
}

#[test]
fn test_models_are_sorted() {
    let registry = common::registry();
    let models = registry.models();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0], (&Knob::API, &Knob::MODEL));
    assert_eq!(models[1], (&Gauge::API, &Gauge::MODEL));
}

#[test]
fn test_select_narrows_registry() {
    let registry = common::registry();
    let only_gauge = registry.select(&[(Gauge::API, Gauge::MODEL)]).unwrap();
    assert_eq!(only_gauge.len(), 1);

    let missing: Model = "acme:test:missing".parse().unwrap();
    let err = registry.select(&[(Api::SENSOR, missing)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownModel);
}

#[test]
fn test_registration_validates_and_constructs() {
    let registry = common::registry();
    let registration = registry.require(&Gauge::API, &Gauge::MODEL).unwrap();

    let config = gauge("front", 2);
    assert!(registration.validate(&config.attributes, &config.path()).unwrap().is_empty());

    let resource = registration.construct(&Dependencies::new(), &config).unwrap();
    assert_eq!(resource.name().to_string(), "rdk:component:sensor/front");
}
