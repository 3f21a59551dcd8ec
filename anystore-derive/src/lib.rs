#![recursion_limit = "128"]
//! # anystore derive macros
//!
//! ### `Entity`
//!
//! Derives `anystore::entity::Entity` for structs with named fields.
//!
//! - **Container attribute**: `#[entity(name = "...", id = "...", etag = "...", timestamp = "...")]`
//! - `name` defaults to the struct name, `id` defaults to a field called `id`
//! - `etag` must name an `Option<String>` field and `timestamp` an
//!   `Option<anystore::entity::Timestamp>` field; without them the entity
//!   does not track versions or modification time
//!
//! # Examples
//!
//! ```rust,ignore
//! use anystore::entity::Timestamp;
//! use anystore_derive::Entity;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize, Entity)]
//! #[entity(name = "orders", id = "order_id", etag = "version", timestamp = "modified")]
//! pub struct Order {
//!     pub order_id: String,
//!     pub version: Option<String>,
//!     pub modified: Option<Timestamp>,
//!     pub customer: String,
//! }
//! ```

extern crate proc_macro;
mod entity;

use crate::entity::generate_entity_for_struct;
use proc_macro::TokenStream;
use syn::{Data, DeriveInput};

/// Derives the `Entity` trait.
///
/// # Errors
///
/// Returns a compile error if:
/// - Applied to an enum, a union, a tuple struct or a unit struct
/// - An attribute names a field the struct does not have
/// - The `entity` attribute contains an unknown key
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    match ast.data {
        Data::Struct(ref data) => match generate_entity_for_struct(&ast, data) {
            Ok(token_stream) => token_stream,
            Err(e) => e.to_compile_error().into(),
        },
        Data::Enum(_) => syn::Error::new_spanned(
            &ast,
            "Cannot derive Entity for enums. Only structs with named fields are supported.",
        )
        .to_compile_error()
        .into(),
        Data::Union(_) => syn::Error::new_spanned(
            &ast,
            "Cannot derive Entity for unions. Only structs with named fields are supported.",
        )
        .to_compile_error()
        .into(),
    }
}
