//! # Module
//!
//! Hosts the registered models behind a Unix domain socket assigned by the host.
//!
//! The host connects, announces itself with `ready`, and then drives each resource
//! through its lifecycle with newline-delimited JSON requests. The module runs until
//! the shutdown future resolves (SIGINT/SIGTERM for [`Module::run`]), then closes every
//! live resource and removes the socket file.
//!
//! ## Example
//! ```no_run
//! use modkit_module::Module;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Module::builder()
//!         .socket("/tmp/mysensor.sock")
//!         .build()?
//!         .run()
//!         .await?;
//!     Ok(())
//! }
//! ```

mod config;
mod connection;
mod error;

pub use crate::config::ModuleConfig;
pub use crate::error::{ModuleError, ModuleErrorExt};

use modkit::domain::names::{Api, Model};
use modkit::kernel::registry::Registry;
use modkit::kernel::session::Session;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::UnixListener;
use tokio::signal;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// A fluent builder for configuring and binding the [`Module`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ModuleBuilder {
    socket: Option<PathBuf>,
    registry: Option<Registry>,
    served: Vec<(Api, Model)>,
}

impl ModuleBuilder {
    /// Applies process settings; values already set on the builder win.
    pub fn config(mut self, cfg: &ModuleConfig) -> Self {
        if self.socket.is_none() {
            self.socket.clone_from(&cfg.socket);
        }
        self
    }

    /// The socket path the host will connect to.
    pub fn socket(mut self, path: impl Into<PathBuf>) -> Self {
        self.socket = Some(path.into());
        self
    }

    /// Replaces the default registry of every enabled model.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Serves only the listed models. Without any call, every registered model is served.
    pub fn serve(mut self, api: Api, model: Model) -> Self {
        self.served.push((api, model));
        self
    }

    /// Consumes the builder, assembles the registry and binds the host socket.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// Returns [`ModuleError::SessionStart`] if no socket path was given, its directory
    /// does not exist or binding fails, and [`ModuleError::Resource`] if a served model
    /// is not registered or registration collides.
    pub fn build(self) -> Result<Module, ModuleError> {
        let socket = self
            .socket
            .ok_or_else(|| ModuleError::session_start("no socket path supplied by the host"))?;

        if let Some(parent) = socket.parent().filter(|p| !p.as_os_str().is_empty())
            && !parent.is_dir()
        {
            return Err(ModuleError::session_start(format!(
                "socket directory {} does not exist",
                parent.display()
            )));
        }

        let registry = match self.registry {
            Some(registry) => registry,
            None => modkit::registry().context("Assembling model registry")?,
        };
        let registry = if self.served.is_empty() {
            registry
        } else {
            registry.select(&self.served).context("Selecting served models")?
        };

        let listener = UnixListener::bind(&socket).map_err(|err| {
            ModuleError::session_start(format!("failed to bind {}: {err}", socket.display()))
        })?;

        info!(socket = %socket.display(), models = registry.len(), "Module bound");
        Ok(Module { listener, socket, session: Arc::new(Session::new(registry)) })
    }
}

/// A bound module ready to serve its host.
#[must_use = "call .run().await to serve the host"]
#[derive(Debug)]
pub struct Module {
    listener: UnixListener,
    socket: PathBuf,
    session: Arc<Session>,
}

impl Module {
    /// Returns a new [`ModuleBuilder`].
    pub fn builder() -> ModuleBuilder {
        ModuleBuilder::default()
    }

    #[must_use]
    pub fn socket(&self) -> &Path {
        &self.socket
    }

    #[must_use]
    pub const fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Serves the host until SIGINT or SIGTERM, then tears down.
    ///
    /// Returns the number of resources closed during teardown.
    ///
    /// # Errors
    /// See [`Module::run_until`].
    pub async fn run(self) -> Result<usize, ModuleError> {
        self.run_until(async {
            match shutdown_signal().await {
                Ok(()) => info!("Shutdown signal received, closing resources"),
                Err(err) => error!("Error while waiting for shutdown signal: {err}"),
            }
        })
        .await
    }

    /// Serves the host until `shutdown` resolves, then tears down.
    ///
    /// Teardown stops accepting, lets every connection finish its in-flight requests,
    /// closes every live resource exactly once and removes the socket file.
    ///
    /// # Errors
    /// Returns [`ModuleError::Io`] if the socket file cannot be removed.
    pub async fn run_until<F>(self, shutdown: F) -> Result<usize, ModuleError>
    where
        F: Future<Output = ()> + Send,
    {
        let (stop, stopped) = watch::channel(false);
        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, _)) => {
                        connections.spawn(connection::serve(
                            stream,
                            Arc::clone(&self.session),
                            stopped.clone(),
                        ));
                    }
                    Err(err) => warn!(error = %err, "Failed to accept host connection"),
                },
            }
        }

        stop.send_replace(true);
        while let Some(joined) = connections.join_next().await {
            if let Err(err) = joined {
                warn!(error = %err, "Connection task failed");
            }
        }

        let closed = self.session.shutdown();
        drop(self.listener);
        match std::fs::remove_file(&self.socket) {
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(socket = %self.socket.display(), "Socket file already gone");
            }
            result => result.context(format!("Removing socket {}", self.socket.display()))?,
        }

        info!(closed, "Module shut down");
        Ok(closed)
    }
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
///
/// # Errors
/// Returns [`ModuleError::Io`] if a signal handler cannot be installed.
pub async fn shutdown_signal() -> Result<(), ModuleError> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, ModuleError>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<(), ModuleError>>();

    tokio::select! {
        res = ctrl_c => res?,
        res = terminate => res?,
    }

    debug!("Shutdown signal observed");
    Ok(())
}
