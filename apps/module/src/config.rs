use crate::error::{ModuleError, ModuleErrorExt};
use modkit::kernel::config::load_config;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Process settings of the module executable.
///
/// Command-line arguments win over these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Unix socket the host connects to.
    pub socket: Option<PathBuf>,
    pub log_level: Option<String>,
    /// Directory for rolling log files; console only when unset.
    pub log_dir: Option<PathBuf>,
    pub json_logs: bool,
}

impl ModuleConfig {
    /// Loads settings from the optional file plus `MODKIT__*` environment overrides.
    ///
    /// # Errors
    /// [`ModuleError::Config`] if the file is missing or the settings are malformed.
    pub fn load(path: Option<&Path>) -> Result<Self, ModuleError> {
        load_config(path).context("Loading module settings")
    }
}
