//! Procedural macros for `itinerary-rs`.

mod completion_schema;
mod schema_extraction;

use proc_macro::TokenStream;

/// Registers a named struct as a completion schema.
///
/// The generated `CompletionSchema` impl builds the JSON Schema once with
/// `schemars`, copies the struct and field doc comments into it as titles and
/// descriptions, and caches the resulting `SchemaHandle` for the process.
///
/// Accepts optional `name = "..."` and `description = "..."` overrides.
#[proc_macro_attribute]
pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    completion_schema::completion_schema(attr, item)
}
