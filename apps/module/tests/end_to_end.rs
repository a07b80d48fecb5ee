mod common;

use common::{Client, MODEL, Running, SENSOR, error_kind, sensor_config};
use serde_json::json;

const FRONT: &str = "rdk:component:sensor/front";

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_sensor_lifecycle_over_socket() {
    let module = Running::start().await;
    let mut host = Client::connect(&module.socket).await;

    let ready = host.call("ready", json!(null)).await;
    let models = ready["ok"]["models"].as_array().unwrap();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0]["api"], json!(SENSOR));
    assert_eq!(models[0]["model"], json!(MODEL));

    let validated =
        host.call("validate_config", json!({ "config": sensor_config("front", 0) })).await;
    assert_eq!(error_kind(&validated), "validation");

    let added = host.call("add_resource", json!({ "config": sensor_config("front", 5) })).await;
    assert_eq!(added, json!({ "ok": {} }));

    let readings = host.call("readings", json!({ "name": FRONT })).await;
    assert_eq!(readings["ok"]["setting"], json!(5));
    assert_eq!(readings["ok"]["hello"], json!("world"));

    let reconfigured =
        host.call("reconfigure_resource", json!({ "config": sensor_config("front", 9) })).await;
    assert!(reconfigured.get("ok").is_some(), "reconfigure failed: {reconfigured}");
    let readings = host.call("readings", json!({ "name": FRONT })).await;
    assert_eq!(readings["ok"]["setting"], json!(9));

    let rejected =
        host.call("reconfigure_resource", json!({ "config": sensor_config("front", 0) })).await;
    assert_eq!(error_kind(&rejected), "validation");
    let readings = host.call("readings", json!({ "name": FRONT })).await;
    assert_eq!(readings["ok"]["setting"], json!(9));

    let command = host.call("do_command", json!({ "name": FRONT, "command": { "go": 1 } })).await;
    assert_eq!(error_kind(&command), "unimplemented");

    assert_eq!(module.stop().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_request_errors_are_reported() {
    let module = Running::start().await;
    let mut host = Client::connect(&module.socket).await;

    let mut unknown = sensor_config("front", 1);
    unknown["model"] = json!("acme:demo:absent");
    let outcome = host.call("add_resource", json!({ "config": unknown })).await;
    assert_eq!(error_kind(&outcome), "unknown_model");

    host.call("add_resource", json!({ "config": sensor_config("front", 1) })).await;
    let outcome = host.call("add_resource", json!({ "config": sensor_config("front", 2) })).await;
    assert_eq!(error_kind(&outcome), "already_exists");

    let outcome = host
        .call("add_resource", json!({ "config": sensor_config("back", 1), "dependencies": ["arm"] }))
        .await;
    assert_eq!(error_kind(&outcome), "missing_dependency");

    let outcome = host.call("readings", json!({ "name": "rdk:component:sensor/nobody" })).await;
    assert_eq!(error_kind(&outcome), "not_found");

    assert_eq!(module.stop().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_malformed_line_keeps_connection() {
    let module = Running::start().await;
    let mut host = Client::connect(&module.socket).await;

    let reply = host.send_line("{ this is not json").await;
    assert_eq!(reply["id"], json!(0));
    assert_eq!(error_kind(&reply["outcome"]), "malformed_request");

    let reply = host.send_line(r#"{"id": 4, "request": {"method": "reboot"}}"#).await;
    assert_eq!(error_kind(&reply["outcome"]), "malformed_request");

    let ready = host.call("ready", json!(null)).await;
    assert!(ready.get("ok").is_some());

    assert_eq!(module.stop().await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_close_and_remove() {
    let module = Running::start().await;
    let mut host = Client::connect(&module.socket).await;

    host.call("add_resource", json!({ "config": sensor_config("front", 3) })).await;
    host.call("add_resource", json!({ "config": sensor_config("back", 4) })).await;

    assert!(host.call("close", json!({ "name": FRONT })).await.get("ok").is_some());
    assert!(host.call("close", json!({ "name": FRONT })).await.get("ok").is_some());
    let closed = host.call("readings", json!({ "name": FRONT })).await;
    assert_eq!(error_kind(&closed), "instance_closed");

    let removed =
        host.call("remove_resource", json!({ "name": "rdk:component:sensor/back" })).await;
    assert!(removed.get("ok").is_some());

    assert_eq!(module.stop().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shutdown_removes_socket_file() {
    let module = Running::start().await;
    let socket = module.socket.clone();
    assert!(socket.exists());

    let mut host = Client::connect(&socket).await;
    host.call("add_resource", json!({ "config": sensor_config("front", 1) })).await;

    assert_eq!(module.stop().await, 1);
    assert!(!socket.exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_hosts() {
    let module = Running::start().await;
    let mut setup = Client::connect(&module.socket).await;
    setup.call("add_resource", json!({ "config": sensor_config("front", 1) })).await;

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let socket = module.socket.clone();
            tokio::spawn(async move {
                let mut host = Client::connect(&socket).await;
                for _ in 0..25 {
                    let readings = host.call("readings", json!({ "name": FRONT })).await;
                    let setting = readings["ok"]["setting"].as_i64().unwrap();
                    assert!(setting == 1 || setting == 2);
                }
            })
        })
        .collect();

    let outcome =
        setup.call("reconfigure_resource", json!({ "config": sensor_config("front", 2) })).await;
    assert!(outcome.get("ok").is_some());

    for task in tasks {
        task.await.unwrap();
    }
    assert_eq!(module.stop().await, 1);
}
