use serde_json::Value;

use crate::{
    error::{ItineraryError, Result},
    schemas::CompletionSchema,
};

/// Strictly decode a JSON document into a completion schema type.
///
/// Errors name the schema and the JSON path of the first offending field,
/// e.g. `failed to decode `NormalizedItinerary` at days[2].morning: missing field `duration``.
pub fn decode_structured_str<T>(raw: &str) -> Result<T>
where
    T: CompletionSchema,
{
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        ItineraryError::Validation(format!(
            "failed to decode `{}` at {}: {}",
            T::schema().schema_name(),
            location,
            err.inner()
        ))
    })
}

/// Same as [`decode_structured_str`] for an already parsed value.
pub fn decode_structured<T>(payload: &Value) -> Result<T>
where
    T: CompletionSchema,
{
    decode_structured_str(&payload.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NormalizedItinerary;
    use serde_json::json;

    #[test]
    fn test_decode_reports_path() {
        let payload = json!({
            "summary": {},
            "days": [{
                "day": 1,
                "title": "Day 1",
                "morning": {"early_place": "", "breakfast": "", "place_to_visit": "", "transport_to_next": ""},
                "afternoon": {"lunch": "", "place_to_visit": "", "duration": "", "transport_to_next": ""},
                "evening": {"dinner": "", "place_to_visit": "", "duration": "", "transport_to_next": ""},
                "transport_note_if_long": null,
                "day_tips": ""
            }]
        });

        let err = decode_structured::<NormalizedItinerary>(&payload).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("NormalizedItinerary"), "{message}");
        assert!(message.contains("days[0].morning"), "{message}");
        assert!(message.contains("duration"), "{message}");
    }

    #[test]
    fn test_decode_accepts_missing_extras() {
        let payload = json!({ "days": [] });
        let itinerary = decode_structured::<NormalizedItinerary>(&payload).unwrap();
        assert!(itinerary.days.is_empty());
        assert!(itinerary.extras.is_empty());
        assert_eq!(itinerary.summary, json!({}));
    }
}
