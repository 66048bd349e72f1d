#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate in the directory workspace:
//!
//! * [`macro@orgdir_error`] turns an enum into a `thiserror` error with context support.
//! * [`macro@api_model`] and [`macro@api_handler`] keep DTOs and Axum handlers consistent
//!   with the `OpenAPI` document.
//! * [`macro@orgdir_slice`] wraps a feature state into a registrable slice handle.
//! * [`macro@main`] bootstraps the tuned Tokio runtime from `orgdir-runtime`.
//!
//! Examples are `ignore`d here because a proc-macro crate cannot use its own macros;
//! the consuming crates exercise them in their tests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to bootstrap the Tokio runtime with a named profile.
///
/// Turns an `async fn main` returning a `Result` into a synchronous `fn main`
/// that builds the runtime through `orgdir_runtime::build_runtime_with_config`.
///
/// # Arguments
///
/// * `server` - Multi-threaded profile tuned for the HTTP server.
/// * `compact` - Small worker pool for tools and tests.
/// * `default` - Worker threads auto-detected from available parallelism.
///
/// # Examples
///
/// ```rust,ignore
/// #[orgdir_runtime::main(server)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro to define a standard API data model.
///
/// # Injected Behaviors
///
/// * **Derives**: `Debug`, `Serialize` and `Deserialize` when missing.
/// * **`OpenAPI`**: `utoipa::ToSchema` when the consuming crate enables `server`.
/// * **Serde Policy**: `rename_all = "camelCase"` and `deny_unknown_fields` by default.
///
/// # Arguments
///
/// * `rename_all = "..."` - Overrides the default Serde rename policy.
/// * `deny_unknown_fields = false` - Accepts payloads carrying extra fields.
///
/// # Example
///
/// ```rust,ignore
/// use orgdir_derive::api_model;
///
/// #[api_model(deny_unknown_fields = false)]
/// pub struct RegistrationForm {
///     pub identifier: String,
///     pub legal_name: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Attribute macro to bridge Axum handlers with `OpenAPI` documentation.
///
/// Accepts the usual `utoipa::path` arguments (`get`, `post`, `path = "..."`,
/// `responses(...)`, `tag = "..."`). The path metadata is only emitted when the
/// consuming crate enables its `server` feature.
///
/// # Example
///
/// ```rust,ignore
/// use orgdir_derive::api_handler;
///
/// #[api_handler(
///     get,
///     path = "/api/directory",
///     responses((status = OK, body = DirectoryResponse)),
///     tag = "Directory"
/// )]
/// pub async fn list_directory() -> impl IntoResponse {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Attribute macro for domain error enums.
///
/// # Features
///
/// * **Automatic Derives**: `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: a companion `...Ext` trait adding `.context()` to any `Result`
///   convertible into this error.
/// * **Conversions**: `From<T>` for variants holding a `source` field, so `?` works on
///   upstream errors.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal`
///   variant exists.
///
/// # Requirements
///
/// 1. Applied to an **enum** with named-field variants only.
/// 2. Context-aware variants carry `context: Option<Cow<'static, str>>`.
/// 3. Variants wrapping an upstream error carry a `source` field (or `#[source]`/`#[from]`)
///    together with a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use orgdir_derive::orgdir_error;
/// use std::borrow::Cow;
///
/// #[orgdir_error]
/// pub enum StoreError {
///     #[error("Codec failure{}: {source}", format_context(.context))]
///     Codec { source: serde_json::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn decode(bytes: &[u8]) -> Result<Record, StoreError> {
///     serde_json::from_slice(bytes).context("Decoding registration record")
/// }
/// ```
#[proc_macro_attribute]
pub fn orgdir_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define a feature slice handle.
///
/// Generates `<Name>Inner` with the declared fields, an `Arc`-backed `<Name>` wrapper
/// with `new` and `Deref`, and the `FeatureSlice` implementation used by the API state.
///
/// # Example
/// ```rust,ignore
/// #[orgdir_derive::orgdir_slice]
/// pub struct Registration {
///     pub service: Registrations,
/// }
///
/// let slice = Registration::new(RegistrationInner { service });
/// ```
#[proc_macro_attribute]
pub fn orgdir_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
