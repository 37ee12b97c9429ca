use super::{
    extractor::find_object_span, fields::Fields, normalizer::normalize_days,
    sections::extract_labeled_sections,
};
use crate::{
    config::PipelineConfig,
    error::Result,
    types::{ExtraSections, NormalizedItinerary, PlaceCatalogEntry},
};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Raw model text in, render-ready itinerary out.
#[derive(Debug, Clone, Default)]
pub struct ItineraryPipeline {
    config: PipelineConfig,
}

impl ItineraryPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Extract, normalize and assemble one itinerary.
    ///
    /// Extraction errors propagate unchanged; everything after extraction
    /// degrades to defaults instead of failing.
    pub fn run(
        &self,
        raw_text: &str,
        required_days: usize,
        catalog: &[PlaceCatalogEntry],
    ) -> Result<NormalizedItinerary> {
        let preview: String = raw_text.chars().take(self.config.preview_chars).collect();
        debug!(target: "itinerary::pipeline", raw = %preview, "raw model output");

        let (span, document) = find_object_span(raw_text)
            .and_then(|span| span.decode().map(|document| (span, document)))
            .inspect_err(|err| {
                warn!(
                    target: "itinerary::pipeline",
                    code = err.error_code(),
                    error = %err,
                    "model output rejected"
                );
            })?;

        let summary = match document.get("summary") {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(summary) => summary.clone(),
        };

        let entries: &[Value] = document
            .get("days")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let days = normalize_days(entries, required_days, catalog);

        let mut extras = document
            .get("extras")
            .map(sections_from_value)
            .unwrap_or_default();
        if self.config.label_fallback {
            // Headings are only looked for outside the object.
            let (before, after) = span.surrounding_text();
            extras.fill_missing_from(extract_labeled_sections(&format!("{before}\n{after}")));
        }

        info!(
            target: "itinerary::pipeline",
            requested = required_days,
            supplied = entries.len(),
            padded = required_days.saturating_sub(entries.len()),
            with_images = days.iter().filter(|day| day.day_image.is_some()).count(),
            "itinerary normalized"
        );

        Ok(NormalizedItinerary {
            summary,
            days,
            extras,
        })
    }
}

/// Read an `extras` object leniently: unknown keys ignored, scalars rendered,
/// anything else left empty.
fn sections_from_value(value: &Value) -> ExtraSections {
    let fields = Fields::of(value);
    ExtraSections {
        famous_shopping: fields.text_or_empty(&["famous_shopping"]),
        what_to_pack: fields.text_or_empty(&["what_to_pack"]),
        safety_rules: fields.text_or_empty(&["safety_rules"]),
        extra_travel_tips: fields.text_or_empty(&["extra_travel_tips"]),
        estimated_total_budget: fields.text_or_empty(&["estimated_total_budget"]),
        closing_note: fields.text_or_empty(&["closing_note"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ItineraryError;
    use serde_json::json;

    #[test]
    fn test_summary_passthrough_and_default() {
        let pipeline = ItineraryPipeline::default();

        let with_summary = r#"{"summary": {"total_places": 4, "places": ["A"]}, "days": []}"#;
        let itinerary = pipeline.run(with_summary, 1, &[]).unwrap();
        assert_eq!(itinerary.summary, json!({"total_places": 4, "places": ["A"]}));

        let without = r#"{"summary": null, "days": []}"#;
        assert_eq!(pipeline.run(without, 1, &[]).unwrap().summary, json!({}));
    }

    #[test]
    fn test_days_not_an_array() {
        let itinerary = ItineraryPipeline::default()
            .run(r#"{"days": "three days of fun"}"#, 2, &[])
            .unwrap();
        assert_eq!(itinerary.days.len(), 2);
        assert_eq!(itinerary.days[1].morning.breakfast, "Breakfast suggestion");
    }

    #[test]
    fn test_extras_from_document_then_labels() {
        let raw = r#"{"days": [], "extras": {"what_to_pack": "Boots", "closing_note": 42, "safety_rules": ["x"]}}
Safety rules: Watch for wildlife.
Closing note: Ignored because the document has one."#;

        let itinerary = ItineraryPipeline::default().run(raw, 1, &[]).unwrap();
        assert_eq!(itinerary.extras.what_to_pack, "Boots");
        assert_eq!(itinerary.extras.closing_note, "42");
        assert_eq!(itinerary.extras.safety_rules, "Watch for wildlife.");
        assert_eq!(itinerary.extras.famous_shopping, "");
    }

    #[test]
    fn test_headings_inside_the_object_are_ignored() {
        let raw = r#"{"days": [{"day": 1, "day_tips": "Read the park safety rules: stay on trails"}], "extras": {"famous_shopping": "Outlet mall"}}"#;
        let itinerary = ItineraryPipeline::default().run(raw, 1, &[]).unwrap();
        assert_eq!(itinerary.extras.safety_rules, "");
        assert_eq!(itinerary.extras.famous_shopping, "Outlet mall");
        assert_eq!(
            itinerary.days[0].day_tips,
            "Read the park safety rules: stay on trails"
        );
    }

    #[test]
    fn test_label_fallback_can_be_disabled() {
        let raw = "{\"days\": []}\nWhat to pack: umbrella";
        let pipeline = ItineraryPipeline::new(PipelineConfig::default().with_label_fallback(false));
        assert!(pipeline.run(raw, 1, &[]).unwrap().extras.is_empty());
    }

    #[test]
    fn test_extraction_errors_propagate() {
        let err = ItineraryPipeline::default()
            .run("no json here", 3, &[])
            .unwrap_err();
        assert!(matches!(err, ItineraryError::NoObjectStart { .. }));
    }
}
