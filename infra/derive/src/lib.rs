#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the Herald crates.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! herald-derive = { path = "../infra/derive" }
//! thiserror = "2"
//! ```
//!
//! Examples below are `ignore`d because proc-macro crates cannot use their own macros.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining crate error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a source field,
///   enabling `?` on upstream errors.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal`
///   variant is present.
/// * **Kind Tag**: An inherent `kind()` returning the variant name as a `&'static str`,
///   suitable for structured log fields.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Context-aware variants carry `context: Option<Cow<'static, str>>`.
/// 3. Variants with a source (a field named `source`, or marked `#[source]`/`#[from]`)
///    must also carry a context field.
/// 4. Tuple and unit variants are rejected.
///
/// # Example
///
/// ```rust,ignore
/// use herald_derive::herald_error;
/// use std::borrow::Cow;
///
/// #[herald_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read() -> Result<String, StoreError> {
///     std::fs::read_to_string("state").context("Reading persisted state")
/// }
/// ```
#[proc_macro_attribute]
pub fn herald_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
