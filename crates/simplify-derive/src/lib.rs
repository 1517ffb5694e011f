//! Derive macros for simplify
//!
//! Provides `#[derive(Entity)]` and `#[derive(FromRow)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod entity;
mod from_row;

/// Derive `Entity` metadata for a struct and register it for
/// `EntityRegistry::from_inventory`.
///
/// # Example
///
/// ```ignore
/// use simplify::Entity;
///
/// #[derive(Clone, Entity)]
/// #[simplify(table = "User", naming = "pascal")]
/// struct User {
///     user_id: i64,
///     #[simplify(column = "Login")]
///     username: String,
///     #[simplify(relation)]
///     permissions: Vec<Permission>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[simplify(table = "name")]` - Table name (defaults to the struct name)
/// - `#[simplify(naming = "pascal")]` - `none`, `camel`, `pascal` or `snake`
/// - `#[simplify(column = "name")]` - Map a field to an explicit column
/// - `#[simplify(relation)]` / `#[simplify(skip)]` - Not a mapped property
///
/// Mapped fields must implement `Clone` and `Into<Value>`.
#[proc_macro_derive(Entity, attributes(simplify))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `FromRow` for a struct.
///
/// Columns are resolved the same way as for `Entity`. Relation and skipped
/// fields are filled with `Default::default()`.
///
/// # Example
///
/// ```ignore
/// use simplify::FromRow;
///
/// #[derive(FromRow)]
/// #[simplify(naming = "pascal")]
/// struct Permission {
///     permission_id: i64,
///     user_id: i64,
/// }
/// ```
#[proc_macro_derive(FromRow, attributes(simplify))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
