//! Derive macros for sqlgate
//!
//! Provides `#[derive(Model)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod common;
mod model;

/// Derive a `sqlgate::Model` schema for a struct.
///
/// # Example
///
/// ```ignore
/// use sqlgate::Model;
///
/// #[derive(Model)]
/// #[orm(table = "users")]
/// pub struct User {
///     pub id: i64,
///     pub username: String,
///     #[orm(column = "email_address")]
///     pub email: Option<String>,
///     #[orm(skip)]
///     pub cached_score: f64,
///     secret: String,
/// }
/// ```
///
/// Only `pub` fields become columns, in declaration order. `Option<T>`
/// fields are nullable.
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Table name (required)
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(skip)]` - Leave a public field out of the schema
#[proc_macro_derive(Model, attributes(orm))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
