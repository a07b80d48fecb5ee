#![allow(dead_code)]

use modkit_module::{Module, ModuleError};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::UnixStream;
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;

pub const SENSOR: &str = "rdk:component:sensor";
pub const MODEL: &str = "viam-soleng:sensor:mysensor";
const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

/// A module serving on a socket in a temporary directory.
pub struct Running {
    pub socket: PathBuf,
    stop: oneshot::Sender<()>,
    task: JoinHandle<Result<usize, ModuleError>>,
    _dir: tempfile::TempDir,
}

impl Running {
    pub async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("mysensor.sock");
        let module = Module::builder().socket(&socket).build().unwrap();

        let (stop, stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(module.run_until(async {
            let _ = stopped.await;
        }));

        Self { socket, stop, task, _dir: dir }
    }

    /// Triggers shutdown and returns how many resources were closed.
    pub async fn stop(self) -> usize {
        self.stop.send(()).unwrap();
        timeout(REPLY_TIMEOUT, self.task).await.unwrap().unwrap().unwrap()
    }
}

pub struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
    next_id: u64,
}

impl Client {
    pub async fn connect(socket: &Path) -> Self {
        let stream = UnixStream::connect(socket).await.unwrap();
        let (reader, writer) = stream.into_split();
        Self { lines: BufReader::new(reader).lines(), writer, next_id: 1 }
    }

    pub async fn send_line(&mut self, line: &str) -> Value {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        let reply = timeout(REPLY_TIMEOUT, self.lines.next_line()).await.unwrap().unwrap().unwrap();
        serde_json::from_str(&reply).unwrap()
    }

    /// Sends one request and returns its outcome. `Value::Null` params are omitted.
    pub async fn call(&mut self, method: &str, params: Value) -> Value {
        let id = self.next_id;
        self.next_id += 1;

        let mut request = json!({ "id": id, "request": { "method": method } });
        if !params.is_null() {
            request["request"]["params"] = params;
        }
        let reply = self.send_line(&request.to_string()).await;
        assert_eq!(reply["id"], json!(id));
        reply["outcome"].clone()
    }
}

pub fn sensor_config(name: &str, setting: i64) -> Value {
    json!({ "name": name, "api": SENSOR, "model": MODEL, "attributes": { "setting": setting } })
}

pub fn error_kind(outcome: &Value) -> &str {
    outcome["error"]["kind"].as_str().unwrap_or_else(|| panic!("not an error: {outcome}"))
}
