use crate::{
    error::ItineraryError,
    schemas::{CompletionSchema, SchemaHandle},
    types::NormalizedItinerary,
};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use tracing::debug;

const MAX_SCHEMA_ERRORS: usize = 3;

/// Validate a payload against a completion schema, reporting at most
/// [`MAX_SCHEMA_ERRORS`] violations.
pub fn validate_structured_payload(
    schema: &SchemaHandle,
    payload: &Value,
) -> std::result::Result<(), ItineraryError> {
    let validator = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema.schema_json())
        .map_err(|err| {
            ItineraryError::Validation(format!(
                "Failed to prepare `{}` schema for validation: {}",
                schema.schema_name(),
                err
            ))
        })?;

    let Err(errors) = validator.validate(payload) else {
        return Ok(());
    };

    let mut details = Vec::new();
    let mut truncated = false;
    for (idx, error) in errors.enumerate() {
        if idx == MAX_SCHEMA_ERRORS {
            truncated = true;
            break;
        }
        let mut path = error.instance_path.to_string();
        if path.is_empty() {
            path = "<root>".to_string();
        }
        details.push(format!("{}: {}", path, error));
    }

    let mut detail_str = if details.is_empty() {
        "payload failed schema validation".to_string()
    } else {
        details.join("; ")
    };
    if truncated {
        detail_str.push_str("; additional errors truncated");
    }

    debug!(
        target: "itinerary::schema",
        schema = schema.schema_name(),
        error = %detail_str,
        payload = %payload
    );

    Err(ItineraryError::Validation(format!(
        "Payload does not match `{}` schema: {}",
        schema.schema_name(),
        detail_str
    )))
}

/// Check a normalized itinerary is render-ready before it leaves the crate.
pub fn validate_itinerary(itinerary: &NormalizedItinerary) -> crate::Result<()> {
    let payload = serde_json::to_value(itinerary)?;
    validate_structured_payload(NormalizedItinerary::schema(), &payload)
}
