#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Attribute macros shared by every crate of the workspace: error enums,
//! feature slice handles and the JSON API surface.
//!
//! Each macro expands to plain `thiserror`/`serde`/`utoipa` code, so the
//! consuming crate must depend on those crates itself.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Declares a crate error enum.
///
/// # Injected items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<Name>Ext` trait adding `.context(...)` to `Result<T, Name>` and to
///   `Result<T, Source>` for every variant holding a `source` field.
/// * `From<Source>` for every variant holding a `source` field.
/// * `From<&'static str>` / `From<String>` when an `Internal { message, context }`
///   variant exists.
/// * A module-level `format_context` helper used by the `#[error(...)]` strings.
///   Declare one error enum per module.
///
/// # Requirements
///
/// Every variant uses named fields. A variant with a `source` field must also
/// carry `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[handy_derive::handy_error]
/// pub enum BackendError {
///     #[error("Transport error{}: {source}", format_context(.context))]
///     Transport { source: reqwest::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal backend error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn handy_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}

/// Turns a struct into a feature slice handle.
///
/// `#[handy_slice] pub struct Registration { .. }` produces `RegistrationInner`
/// with the declared fields, an `Arc`-backed `Registration` wrapper that derefs
/// to it, and the `FeatureSlice` impl used by the kernel's slice registry.
///
/// ```rust,ignore
/// #[handy_derive::handy_slice]
/// pub struct Dashboard {
///     pub catalog: Catalog,
/// }
///
/// let slice = Dashboard::new(DashboardInner { catalog: Catalog::demo() });
/// ```
#[proc_macro_attribute]
pub fn handy_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand(input).into()
}

/// Declares a JSON API model.
///
/// Adds `Debug`, `Serialize` and `Deserialize` when missing, derives
/// `utoipa::ToSchema` under the `server` feature, and applies
/// `rename_all = "camelCase"` unless `rename_all = "..."` is given.
///
/// ```rust,ignore
/// #[handy_derive::api_model(rename_all = "snake_case")]
/// pub struct LocalityList {
///     pub region: String,
///     pub localities: Vec<String>,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_model(attr.into(), input).into()
}

/// Registers an axum handler with `utoipa::path` under the `server` feature.
///
/// Accepts the regular `utoipa::path` arguments.
///
/// ```rust,ignore
/// #[handy_derive::api_handler(
///     get,
///     path = "/api/regions",
///     responses((status = OK, body = RegionList)),
///     tag = "Regions"
/// )]
/// pub async fn list_regions(State(state): State<AppState>) -> Json<RegionList> { .. }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_handler(args.into(), input).into()
}
