//! # Domain Models
//!
//! This crate contains pure naming types with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: identifiers and small helpers only, no I/O.
//!
//! ```rust
//! use modkit_domain::names::{Api, Model, ResourceName};
//!
//! let model: Model = "viam-soleng:sensor:mysensor".parse().unwrap();
//! assert_eq!(model.family(), "sensor");
//!
//! let name = ResourceName::new(Api::SENSOR, "front");
//! assert_eq!(name.to_string(), "rdk:component:sensor/front");
//! ```

pub mod capabilities;
pub mod constants;
pub mod names;
