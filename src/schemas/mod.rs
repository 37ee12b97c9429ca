//! JSON Schema handles for completion types and payload validation.

pub mod schema;
pub mod validation;

pub use schema::{apply_doc_comments, CompletionSchema, SchemaHandle};
pub use validation::{validate_itinerary, validate_structured_payload};
