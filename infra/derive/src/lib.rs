#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the module infrastructure.
//! This crate provides attribute macros that remove boilerplate from error enums,
//! component model declarations and the async runtime bootstrap.
//!
//! ## Usage
//! Add the crate as a workspace dependency:
//! ```toml
//! [dependencies]
//! modkit-derive.workspace = true
//! ```
//!
//! See each macro’s docstring for examples; they are `ignore`d to avoid compiling in this crate.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to bootstrap the module's Tokio runtime.
///
/// Transforms an `async fn main` into a standard `fn main` that builds a runtime
/// from a `modkit_runtime::RuntimeConfig` preset and blocks on the body.
///
/// # Arguments
///
/// * `module` - Small footprint for a process hosted by an external orchestrator.
/// * `single_worker` - One worker thread; handy for tests and constrained devices.
/// * `default` - Worker threads auto-detected from available parallelism.
///
/// # Examples
///
/// ```rust,ignore
/// #[modkit_runtime::main(module)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// A high-level attribute macro for defining crate-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context()`
///   to `Result<T, Name>` and to results of every wrapped source error.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source`
///   field (or a field marked `#[source]`/`#[from]`), enabling `?` on upstream errors.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>` when an
///   `Internal { message, context }` variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Every variant uses named fields; tuple and unit variants are rejected.
/// 3. Variants with a source must also carry `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[modkit_derive::modkit_error]
/// pub enum ModuleError {
///     #[error("I/O error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn bind(path: &Path) -> Result<UnixListener, ModuleError> {
///     UnixListener::bind(path).context("Binding host socket")
/// }
/// ```
#[proc_macro_attribute]
pub fn modkit_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_error(input).into()
}

/// Attribute macro declaring which API and model a component implements.
///
/// Both arguments are colon-delimited triplets and are checked at compile time.
/// The struct gains an implementation of `modkit_kernel::registry::Modeled`, which
/// is what `RegistryBuilder::register_component` keys the registration by.
///
/// # Example
/// ```rust,ignore
/// #[modkit_derive::model(api = "rdk:component:sensor", model = "acme:demo:thermo")]
/// #[derive(Debug)]
/// pub struct Thermo {
///     celsius: f64,
/// }
/// ```
#[proc_macro_attribute]
pub fn model(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::model::expand_model(args.into(), input).into()
}
