//! Day-record normalization.
//!
//! Turns whatever the model produced for `days` into exactly `required_count`
//! fixed-shape [`DayRecord`]s. Nothing in here can fail: every malformed or
//! missing field degrades to its documented default.

use super::{
    fields::{scalar_text, Fields},
    images::resolve_day_image,
    shape::DayShape,
};
use crate::types::{AfternoonBlock, DayRecord, EveningBlock, MorningBlock, PlaceCatalogEntry};
use serde_json::Value;
use tracing::debug;

const PLACEHOLDER_PLACE: &str = "**Local**";

/// Normalize model day entries into exactly `required_count` day records.
///
/// Entries past `required_count` are dropped; missing days are padded with
/// [`placeholder_day`]s numbered after the last produced record's position.
pub fn normalize_days(
    source_entries: &[Value],
    required_count: usize,
    place_catalog: &[PlaceCatalogEntry],
) -> Vec<DayRecord> {
    let mut days: Vec<DayRecord> = source_entries
        .iter()
        .take(required_count)
        .enumerate()
        .map(|(position, entry)| normalize_entry(position, entry, place_catalog))
        .collect();

    if source_entries.len() > required_count {
        debug!(
            target: "itinerary::normalize",
            dropped = source_entries.len() - required_count,
            "dropping surplus day entries"
        );
    }

    while days.len() < required_count {
        days.push(placeholder_day(day_number_for(days.len())));
    }

    days
}

fn day_number_for(position: usize) -> u32 {
    u32::try_from(position + 1).unwrap_or(u32::MAX)
}

fn normalize_entry(position: usize, entry: &Value, catalog: &[PlaceCatalogEntry]) -> DayRecord {
    let fields = Fields::of(entry);

    let day = fields
        .positive_int("day")
        .unwrap_or_else(|| day_number_for(position));
    let title = fields
        .text(&["title", "day_title"])
        .unwrap_or_else(|| format!("Day {day}"));

    let shape = DayShape::decode(fields);
    if shape.is_legacy() {
        debug!(target: "itinerary::normalize", day, "day entry uses meal-keyed layout");
    }
    let (morning, afternoon, evening) = shape.into_blocks();

    let mut record = DayRecord {
        day,
        title,
        morning,
        afternoon,
        evening,
        transport_note_if_long: fields.get("transport_note_if_long").and_then(note_text),
        day_tips: fields.text_or_empty(&["day_tips", "tips"]),
        day_image: None,
    };

    // Any `day_image` in the entry is ignored. Padding days never carry an image.
    if record != placeholder_day(day) {
        record.day_image = resolve_day_image(&record.morning.place_to_visit, catalog);
    }
    record
}

/// Transport notes pass through; only null means "no note".
fn note_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        scalar => scalar_text(scalar),
    }
}

/// Synthetic day used to pad short model output.
pub fn placeholder_day(day: u32) -> DayRecord {
    DayRecord {
        day,
        title: format!("Day {day}"),
        morning: MorningBlock {
            early_place: String::new(),
            breakfast: "Breakfast suggestion".to_string(),
            place_to_visit: PLACEHOLDER_PLACE.to_string(),
            duration: "1 hour".to_string(),
            transport_to_next: "Short walk, 0.2 mi, walk, $0".to_string(),
        },
        afternoon: AfternoonBlock {
            lunch: "Lunch suggestion".to_string(),
            place_to_visit: PLACEHOLDER_PLACE.to_string(),
            duration: "1 hour".to_string(),
            transport_to_next: "Short walk, 0.5 mi, walk, $0".to_string(),
        },
        evening: EveningBlock {
            dinner: "Dinner suggestion".to_string(),
            place_to_visit: PLACEHOLDER_PLACE.to_string(),
            duration: "1-2 hours".to_string(),
            transport_to_next: "N/A".to_string(),
        },
        transport_note_if_long: None,
        day_tips: String::new(),
        day_image: None,
    }
}
