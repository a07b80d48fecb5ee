//! # Kernel
//!
//! Lifecycle engine for pluggable resources hosted by an external orchestrator.
//!
//! * [`resource`]: the component contract, settings validation and the generic [`Instance`](resource::Instance).
//! * [`registry`]: the startup-time catalogue of constructible models.
//! * [`session`]: dispatch of host lifecycle calls onto live resources.
//! * [`protocol`]: transport-agnostic request and reply messages.
//! * [`config`]: layered module settings (file plus `MODKIT__` environment overrides).
//!
//! ## Example
//! ```rust,ignore
//! use modkit_kernel::prelude::*;
//!
//! let mut builder = Registry::builder();
//! builder.register_component::<MySensor>()?;
//! let session = Session::new(builder.build());
//! ```
pub mod config;
pub mod error;
pub mod prelude;
pub mod protocol;
pub mod registry;
pub mod resource;
pub mod session;

pub use modkit_domain as domain;
