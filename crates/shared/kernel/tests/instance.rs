mod common;

use common::{Gauge, document, gauge};
use modkit_kernel::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

fn construct(level: i64) -> Instance<Gauge> {
    Instance::<Gauge>::construct(&Dependencies::new(), &gauge("front", level)).unwrap()
}

#[test]
fn test_construct_rejects_invalid_settings() {
    let err = Instance::<Gauge>::construct(&Dependencies::new(), &gauge("front", 0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("components.front"));
}

#[test]
fn test_readings_reflect_settings() {
    let instance = construct(3);
    let readings = instance.readings(&Document::new()).unwrap();
    assert_eq!(readings, document(json!({ "level": 3, "doubled": 6 })));
}

#[test]
fn test_reconfigure_swaps_snapshot() {
    let instance = construct(3);
    let before = instance.snapshot().unwrap();

    instance.reconfigure(&Dependencies::new(), &gauge("front", 5)).unwrap();

    assert_eq!(instance.readings(&Document::new()).unwrap()["level"], json!(5));
    // Holders of the old snapshot are unaffected.
    assert_eq!(before.readings(&Document::new()).unwrap()["level"], json!(3));
}

#[test]
fn test_failed_reconfigure_keeps_previous_settings() {
    let instance = construct(3);

    let err = instance.reconfigure(&Dependencies::new(), &gauge("front", -1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(instance.readings(&Document::new()).unwrap()["level"], json!(3));
}

#[test]
fn test_reconfigure_cannot_rename() {
    let instance = construct(3);
    let err = instance.reconfigure(&Dependencies::new(), &gauge("back", 4)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_missing_implicit_dependency() {
    let config = gauge("front", 1).with_attribute("source", "arm");
    let err = Instance::<Gauge>::construct(&Dependencies::new(), &config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingDependency);
}

#[test]
fn test_implicit_dependency_resolved() {
    let arm: Arc<dyn Resource> = Arc::new(construct(1));
    let dependencies: Dependencies = std::iter::once(arm).collect();

    let config = gauge("back", 1).with_attribute("source", "front");
    assert!(Instance::<Gauge>::construct(&dependencies, &config).is_ok());
}

#[test]
fn test_close_is_idempotent_and_final() {
    let instance = construct(3);

    instance.close().unwrap();
    instance.close().unwrap();
    assert!(instance.is_closed());

    let readings = instance.readings(&Document::new()).unwrap_err();
    assert_eq!(readings.kind(), ErrorKind::InstanceClosed);
    let command = instance.do_command(&Document::new()).unwrap_err();
    assert_eq!(command.kind(), ErrorKind::InstanceClosed);
    let reconfigure = instance.reconfigure(&Dependencies::new(), &gauge("front", 4)).unwrap_err();
    assert_eq!(reconfigure.kind(), ErrorKind::InstanceClosed);
}

#[test]
fn test_readers_never_observe_torn_snapshots() {
    let instance = Arc::new(construct(1));
    let stop = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let instance = Arc::clone(&instance);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut observed = 0_u64;
                while !stop.load(Ordering::Relaxed) {
                    let readings = instance.readings(&Document::new()).unwrap();
                    let level = readings["level"].as_i64().unwrap();
                    assert_eq!(readings["doubled"].as_i64().unwrap(), level * 2);
                    assert!((1..=200).contains(&level));
                    observed += 1;
                }
                observed
            })
        })
        .collect();

    for level in 1..=200 {
        instance.reconfigure(&Dependencies::new(), &gauge("front", level)).unwrap();
    }
    stop.store(true, Ordering::Relaxed);

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(instance.readings(&Document::new()).unwrap()["level"], json!(200));
}

#[test]
fn test_close_racing_reconfigure_leaves_instance_closed() {
    for _ in 0..50 {
        let instance = Arc::new(construct(1));

        let reconfigurer = {
            let instance = Arc::clone(&instance);
            thread::spawn(move || instance.reconfigure(&Dependencies::new(), &gauge("front", 9)))
        };
        instance.close().unwrap();

        match reconfigurer.join().unwrap() {
            Ok(()) => {}
            Err(err) => assert_eq!(err.kind(), ErrorKind::InstanceClosed),
        }
        assert!(instance.is_closed());
        assert_eq!(
            instance.readings(&Document::new()).unwrap_err().kind(),
            ErrorKind::InstanceClosed
        );
    }
}

#[test]
fn test_default_do_command_is_unimplemented() {
    let instance =
        Instance::<common::Knob>::construct(&Dependencies::new(), &knob_config()).unwrap();
    let err = instance.do_command(&Document::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unimplemented);
}

fn knob_config() -> ResourceConfig {
    ResourceConfig::new("dial", Api::GENERIC, "acme:test:knob".parse().unwrap())
        .with_attribute("level", 1)
}
