use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// Prefix of environment overrides, e.g. `MODKIT__LOG_LEVEL`.
pub const ENV_PREFIX: &str = "MODKIT";

#[modkit_derive::modkit_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads layered module settings.
///
/// Layers, lowest precedence first:
/// 1. **File**: the optional `path`. When given, the file must exist; its format is
///    inferred from the extension (`module.toml`, `module.json`, ...).
/// 2. **Environment**: variables prefixed with `MODKIT__`. Nested keys use double
///    underscores (`MODKIT__RUNTIME__WORKERS` maps to `runtime.workers`).
///
/// With no file and no overrides, `T` is built from its serde defaults.
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing or unreadable, or if the merged
/// settings do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use modkit_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// #[serde(default)]
/// struct ModuleSettings {
///     log_level: Option<String>,
/// }
///
/// let settings: ModuleSettings = load_config(None::<&str>)?;
/// # let _ = settings.log_level;
/// # Ok::<(), modkit_kernel::config::ConfigError>(())
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let mut builder = Config::builder();

    if let Some(path) = path {
        let path = path.as_ref();
        info!("Loading config from {}", path.display());
        builder = builder.add_source(File::from(path).required(true));
    }

    builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .convert_case(config::Case::Snake)
                .try_parsing(true),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}
