use crate::completion_schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Render-ready itinerary produced by one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[completion_schema]
pub struct NormalizedItinerary {
    /// Trip overview (places covered, theme coverage, excitement note); passed through as given
    #[serde(default = "empty_object")]
    pub summary: Value,
    /// Exactly one entry per requested day, numbered from 1
    pub days: Vec<DayRecord>,
    /// Closing free-text sections of the plan
    #[serde(default)]
    pub extras: ExtraSections,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

/// One day of the itinerary after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DayRecord {
    /// 1-based day counter
    #[schemars(range(min = 1))]
    pub day: u32,
    /// Short caption for the day
    pub title: String,
    pub morning: MorningBlock,
    pub afternoon: AfternoonBlock,
    pub evening: EveningBlock,
    /// Present only when the day includes long travel (over 80 miles or interstate)
    pub transport_note_if_long: Option<String>,
    pub day_tips: String,
    /// Local image reference resolved from the place catalog
    #[schemars(skip)]
    #[serde(default)]
    pub day_image: Option<String>,
}

/// Morning slot: optional early stop, breakfast, then the first visit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MorningBlock {
    pub early_place: String,
    /// Food with approximate price
    pub breakfast: String,
    pub place_to_visit: String,
    pub duration: String,
    /// From X to Y, mode, miles, approximate cost
    pub transport_to_next: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AfternoonBlock {
    /// Food with approximate price
    pub lunch: String,
    pub place_to_visit: String,
    pub duration: String,
    pub transport_to_next: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EveningBlock {
    /// Food with approximate price
    pub dinner: String,
    pub place_to_visit: String,
    pub duration: String,
    pub transport_to_next: String,
}

/// The six closing sections of a plan. Every key is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ExtraSections {
    pub famous_shopping: String,
    pub what_to_pack: String,
    pub safety_rules: String,
    pub extra_travel_tips: String,
    pub estimated_total_budget: String,
    pub closing_note: String,
}

impl ExtraSections {
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, text)| text.is_empty())
    }

    /// Sections as `(key, text)` pairs in their fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("famous_shopping", self.famous_shopping.as_str()),
            ("what_to_pack", self.what_to_pack.as_str()),
            ("safety_rules", self.safety_rules.as_str()),
            ("extra_travel_tips", self.extra_travel_tips.as_str()),
            ("estimated_total_budget", self.estimated_total_budget.as_str()),
            ("closing_note", self.closing_note.as_str()),
        ]
        .into_iter()
    }

    /// Fill every empty section from `other`.
    pub fn fill_missing_from(&mut self, other: ExtraSections) {
        let pairs = [
            (&mut self.famous_shopping, other.famous_shopping),
            (&mut self.what_to_pack, other.what_to_pack),
            (&mut self.safety_rules, other.safety_rules),
            (&mut self.extra_travel_tips, other.extra_travel_tips),
            (&mut self.estimated_total_budget, other.estimated_total_budget),
            (&mut self.closing_note, other.closing_note),
        ];
        for (slot, fallback) in pairs {
            if slot.is_empty() {
                *slot = fallback;
            }
        }
    }
}

/// Candidate attraction supplied by the catalog. Only `place` and
/// `local_image` matter to normalization; the rest feeds the prompt dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceCatalogEntry {
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub local_image: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub place_desc: Option<String>,
    #[serde(default)]
    pub city_region: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl PlaceCatalogEntry {
    pub fn new(place: impl Into<String>) -> Self {
        Self {
            place: place.into(),
            ..Self::default()
        }
    }

    pub fn with_local_image(mut self, local_image: impl Into<String>) -> Self {
        self.local_image = Some(local_image.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Resolved image reference, ignoring blank values.
    pub fn image(&self) -> Option<&str> {
        self.local_image
            .as_deref()
            .filter(|image| !image.trim().is_empty())
    }
}
