//! Facade crate for module models and shared crates.
//! Re-exports domain/kernel primitives and aggregates model registration.
//! Keep this crate thin: it should compose other crates, not implement lifecycle logic.
//!
//! ## Usage
//! - Add `modkit` with the desired model features (`sensor` is on by default).
//! - Call [`registry`] once at startup and hand the result to the host session.

pub use modkit_domain as domain;
pub use modkit_kernel as kernel;

use modkit_kernel::error::ResourceError;
use modkit_kernel::registry::{Registry, RegistryBuilder};

/// Model registry for runtime introspection.
pub mod features {
    #[cfg(feature = "sensor")]
    pub use modkit_sensor as sensor;

    /// Build-time enabled models (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "sensor")]
        "sensor",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Registers the models of every enabled feature into `builder`.
///
/// # Errors
/// [`ResourceError::DuplicateRegistration`] if two features claim the same model.
pub fn register_all(builder: &mut RegistryBuilder) -> Result<(), ResourceError> {
    #[cfg(feature = "sensor")]
    features::sensor::register(builder)?;

    tracing::debug!(features = ?features::ENABLED, "Models registered");
    Ok(())
}

/// The frozen registry of every enabled model.
///
/// # Errors
/// Returns an error if any feature registration fails.
pub fn registry() -> Result<Registry, ResourceError> {
    let mut builder = Registry::builder();
    register_all(&mut builder)?;
    Ok(builder.build())
}
