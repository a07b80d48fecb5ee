//! # Runtime
//!
//! Tokio runtime presets for module processes.
//!
//! A module is a short-lived guest of a long-running host: it answers lifecycle calls
//! that must return promptly and otherwise sits idle waiting for a shutdown signal.
//! The presets here keep the thread footprint proportional to that workload.
//!
//! ## Profiles
//! * **Default**: worker threads auto-detected (`MODKIT_WORKER_THREADS` or available parallelism).
//! * **Module**: at most four workers, small stacks, short keep-alive.
//! * **Single worker**: one worker thread; deterministic enough for tests and tiny devices.
//!
//! ## Example
//!
//! ```rust,ignore
//! #[modkit_runtime::main(module)]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use anyhow::Result;
pub use modkit_derive::main;

use anyhow::Context;
use std::{sync::OnceLock, thread::available_parallelism, time::Duration};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Fallback when parallelism cannot be detected.
const DEFAULT_WORKER_THREADS: usize = 2;
/// Upper bound for the `module` preset.
const MODULE_MAX_WORKERS: usize = 4;
const MAX_WORKER_THREADS: usize = 256;
/// 2 `MiB`, Tokio's own default.
const DEFAULT_STACK_SIZE: usize = 2 * 1024 * 1024;
const MIN_STACK_SIZE: usize = 512 * 1024;
const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;
const DEFAULT_THREAD_NAME: &str = "modkit-worker";

static DETECTED_WORKERS: OnceLock<usize> = OnceLock::new();

/// Worker count from `MODKIT_WORKER_THREADS`, falling back to the hardware.
fn detected_workers() -> usize {
    *DETECTED_WORKERS.get_or_init(|| {
        std::env::var("MODKIT_WORKER_THREADS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| (1..=MAX_WORKER_THREADS).contains(&n))
            .unwrap_or_else(|| {
                available_parallelism().map_or(DEFAULT_WORKER_THREADS, std::num::NonZero::get)
            })
    })
}

/// Configuration for the module's Tokio runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub worker_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: detected_workers(),
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
            thread_keep_alive: Duration::from_secs(60),
        }
    }
}

impl RuntimeConfig {
    /// Preset for a module hosted by an external orchestrator.
    #[must_use = "Use this configuration to build the module runtime"]
    pub fn module() -> Self {
        Self {
            worker_threads: detected_workers().min(MODULE_MAX_WORKERS),
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: "modkit-module".to_owned(),
            thread_keep_alive: Duration::from_secs(10),
        }
    }

    /// Preset with exactly one worker thread.
    #[must_use = "Use this configuration to build a single-worker runtime"]
    pub fn single_worker() -> Self {
        Self { worker_threads: 1, ..Self::module() }
    }

    #[must_use = "Customize the number of worker threads for the runtime"]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads;
        self.normalized()
    }

    #[must_use = "Customize the stack size for worker threads"]
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = size;
        self.normalized()
    }

    #[must_use = "Customize the thread name"]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self.normalized()
    }

    /// Clamps every field into its supported range.
    fn normalized(mut self) -> Self {
        self.worker_threads = self.worker_threads.clamp(1, MAX_WORKER_THREADS);
        self.stack_size = self.stack_size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE);
        if self.thread_name.trim().is_empty() {
            DEFAULT_THREAD_NAME.clone_into(&mut self.thread_name);
        }
        self
    }
}

/// Builds a multi-threaded Tokio runtime with I/O and timers enabled.
///
/// The configuration is normalized first, so out-of-range values never reach Tokio.
///
/// # Errors
///
/// Returns an error if the operating system refuses to create the worker threads.
///
/// # Examples
///
/// ```rust
/// use modkit_runtime::{RuntimeConfig, build_runtime};
///
/// let runtime = build_runtime(&RuntimeConfig::single_worker())?;
/// assert_eq!(runtime.block_on(async { 40 + 2 }), 42);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn build_runtime(config: &RuntimeConfig) -> Result<Runtime> {
    let config = config.clone().normalized();
    debug!(config = ?config, "Building tokio runtime");

    Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .thread_name(&config.thread_name)
        .thread_stack_size(config.stack_size)
        .thread_keep_alive(config.thread_keep_alive)
        .enable_all()
        .build()
        .context("Failed to initialize runtime")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_threads_are_clamped() {
        assert_eq!(RuntimeConfig::default().with_worker_threads(0).worker_threads, 1);
        assert_eq!(
            RuntimeConfig::default().with_worker_threads(10_000).worker_threads,
            MAX_WORKER_THREADS
        );
    }

    #[test]
    fn test_stack_size_is_clamped() {
        assert_eq!(RuntimeConfig::default().with_stack_size(100).stack_size, MIN_STACK_SIZE);
        assert_eq!(
            RuntimeConfig::default().with_stack_size(100 * 1024 * 1024).stack_size,
            MAX_STACK_SIZE
        );
    }

    #[test]
    fn test_blank_thread_name_falls_back() {
        let config = RuntimeConfig::module().with_thread_name("   ");
        assert_eq!(config.thread_name, DEFAULT_THREAD_NAME);
    }

    #[test]
    fn test_module_preset_is_bounded() {
        let config = RuntimeConfig::module();
        assert!((1..=MODULE_MAX_WORKERS).contains(&config.worker_threads));
        assert_eq!(RuntimeConfig::single_worker().worker_threads, 1);
    }

    #[test]
    fn test_runtime_runs_futures() -> Result<()> {
        let runtime = build_runtime(&RuntimeConfig::single_worker())?;
        assert_eq!(runtime.block_on(async { 2 + 2 }), 4);
        Ok(())
    }
}
