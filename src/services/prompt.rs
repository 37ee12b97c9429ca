use crate::{
    schemas::{CompletionSchema, SchemaHandle},
    types::{NormalizedItinerary, PlaceCatalogEntry},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the traveller asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub states: Vec<String>,
    pub regions: Vec<String>,
    pub days: usize,
    pub season: String,
    pub trip_type: String,
    pub themes: Vec<String>,
    pub budget: String,
    pub target_places: usize,
}

impl TripRequest {
    pub fn new(states: Vec<String>, regions: Vec<String>, days: usize) -> Self {
        Self {
            states,
            regions,
            days,
            season: "summer".to_string(),
            trip_type: "solo".to_string(),
            themes: vec!["Any".to_string()],
            budget: "mid".to_string(),
            target_places: 5,
        }
    }

    /// Destination label shown on the rendered itinerary.
    pub fn destination_label(&self) -> String {
        self.regions.join(", ")
    }
}

/// One `name | region | rating | description` line per sampled catalog row.
pub fn dataset_lines(catalog: &[PlaceCatalogEntry], sample: usize) -> String {
    catalog
        .iter()
        .take(sample)
        .map(|entry| {
            let rating = entry.rating.map(|rating| rating.to_string()).unwrap_or_default();
            let description = entry
                .place_desc
                .as_deref()
                .unwrap_or_default()
                .replace('\n', " ");
            format!(
                "{} | {} | {} | {}",
                entry.place,
                entry.city_region.as_deref().unwrap_or_default(),
                rating,
                description.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the planning prompt for `request` over the sampled catalog.
pub fn render_prompt(request: &TripRequest, catalog: &[PlaceCatalogEntry], sample: usize) -> String {
    PlanningPrompt {
        request,
        catalog,
        sample,
        schema: NormalizedItinerary::schema(),
    }
    .to_string()
}

struct PlanningPrompt<'a> {
    request: &'a TripRequest,
    catalog: &'a [PlaceCatalogEntry],
    sample: usize,
    schema: &'static SchemaHandle,
}

impl fmt::Display for PlanningPrompt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let request = self.request;
        writeln!(
            f,
            "You are an expert travel planner. Use ONLY the dataset below to create a {}-day itinerary.",
            request.days
        )?;
        writeln!(f, "DATASET:\n{}\n", dataset_lines(self.catalog, self.sample))?;

        writeln!(f, "User inputs:")?;
        writeln!(f, "States: {}", request.states.join(", "))?;
        writeln!(f, "Regions: {}", request.regions.join(", "))?;
        writeln!(f, "Days: {}", request.days)?;
        writeln!(f, "Season: {}", request.season)?;
        writeln!(f, "Trip type: {}", request.trip_type)?;
        writeln!(f, "Themes: {}", request.themes.join(", "))?;
        writeln!(f, "Budget: {}", request.budget)?;
        writeln!(f, "Target places: {}\n", request.target_places)?;

        writeln!(f, "STRICT RULES:")?;
        writeln!(
            f,
            "1. Use ONLY the dataset (and only real verifiable nearby places if the dataset is too small). Mark added places as \"(added)\"."
        )?;
        writeln!(
            f,
            "2. Output MUST be valid JSON only, matching the `{}` schema below exactly (no extra commentary).",
            self.schema.schema_name()
        )?;
        writeln!(
            f,
            "3. Each day must include morning (early_place (optional), breakfast, place_to_visit, duration, transport_to_next), afternoon (lunch, place_to_visit, duration, transport_to_next) and evening (dinner, place_to_visit, duration, transport_to_next)."
        )?;
        writeln!(
            f,
            "4. Transport MUST be specified for each segment. If travel is long (>80 miles or interstate) include transport_note_if_long, otherwise set it to null."
        )?;
        writeln!(f, "5. Food items MUST include an approximate price.")?;
        writeln!(f, "6. Keep each text short (10-40 words) and PDF-friendly.\n")?;

        writeln!(f, "JSON Schema:\n{}", self.schema.to_pretty_string())
    }
}
