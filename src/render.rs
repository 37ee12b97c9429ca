//! Render-ready views of a normalized itinerary.

use crate::{
    error::Result,
    schemas::validate_itinerary,
    types::{DayRecord, ExtraSections, NormalizedItinerary},
};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Everything a renderer needs for one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRequest {
    pub destination: String,
    pub duration: String,
    pub days: Vec<DayRecord>,
    pub summary: Value,
    pub extras: ExtraSections,
    /// First resolved day image, used as the cover
    pub header_image: Option<String>,
}

impl RenderRequest {
    pub fn new(
        destination: impl Into<String>,
        days_required: usize,
        itinerary: NormalizedItinerary,
    ) -> Self {
        let header_image = itinerary
            .days
            .iter()
            .find_map(|day| day.day_image.clone());

        Self {
            destination: destination.into(),
            duration: format!("{days_required} days"),
            days: itinerary.days,
            summary: itinerary.summary,
            extras: itinerary.extras,
            header_image,
        }
    }

    fn itinerary(&self) -> NormalizedItinerary {
        NormalizedItinerary {
            summary: self.summary.clone(),
            days: self.days.clone(),
            extras: self.extras.clone(),
        }
    }
}

pub trait ItineraryRenderer {
    fn render(&self, request: &RenderRequest) -> Result<String>;
}

/// Pretty JSON document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl ItineraryRenderer for JsonRenderer {
    fn render(&self, request: &RenderRequest) -> Result<String> {
        validate_itinerary(&request.itinerary())?;
        Ok(serde_json::to_string_pretty(request)?)
    }
}

/// Plain-text day sheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl ItineraryRenderer for TextRenderer {
    fn render(&self, request: &RenderRequest) -> Result<String> {
        validate_itinerary(&request.itinerary())?;

        let out = DaySheet(request).to_string();
        debug!(
            target: "itinerary::render",
            days = request.days.len(),
            bytes = out.len(),
            "text rendered"
        );
        Ok(out)
    }
}

struct DaySheet<'a>(&'a RenderRequest);

impl fmt::Display for DaySheet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let request = self.0;
        writeln!(f, "{} ({})", request.destination, request.duration)?;
        if let Some(image) = &request.header_image {
            writeln!(f, "Cover: {image}")?;
        }
        write_summary(f, &request.summary)?;

        for day in &request.days {
            write_day(f, day)?;
        }

        if !request.extras.is_empty() {
            writeln!(f)?;
            for (key, text) in request.extras.iter().filter(|(_, text)| !text.is_empty()) {
                writeln!(f, "{}: {}", section_heading(key), text)?;
            }
        }
        Ok(())
    }
}

fn write_summary(f: &mut fmt::Formatter<'_>, summary: &Value) -> fmt::Result {
    let Some(summary) = summary.as_object().filter(|summary| !summary.is_empty()) else {
        return Ok(());
    };
    writeln!(f)?;
    for (key, value) in summary {
        let text = match value {
            Value::String(text) => text.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string).unwrap_or_else(|| item.to_string()))
                .collect::<Vec<_>>()
                .join(", "),
            other => other.to_string(),
        };
        writeln!(f, "{}: {}", section_heading(key), text)?;
    }
    Ok(())
}

fn write_day(f: &mut fmt::Formatter<'_>, day: &DayRecord) -> fmt::Result {
    writeln!(f, "\nDay {}: {}", day.day, day.title)?;

    let morning = &day.morning;
    if !morning.early_place.is_empty() {
        writeln!(f, "  Early: {}", morning.early_place)?;
    }
    write_part(
        f,
        "Morning",
        &morning.breakfast,
        &morning.place_to_visit,
        &morning.duration,
        &morning.transport_to_next,
    )?;

    let afternoon = &day.afternoon;
    write_part(
        f,
        "Afternoon",
        &afternoon.lunch,
        &afternoon.place_to_visit,
        &afternoon.duration,
        &afternoon.transport_to_next,
    )?;

    let evening = &day.evening;
    write_part(
        f,
        "Evening",
        &evening.dinner,
        &evening.place_to_visit,
        &evening.duration,
        &evening.transport_to_next,
    )?;

    if let Some(note) = &day.transport_note_if_long {
        writeln!(f, "  Long travel: {note}")?;
    }
    if !day.day_tips.is_empty() {
        writeln!(f, "  Tips: {}", day.day_tips)?;
    }
    Ok(())
}

fn write_part(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    meal: &str,
    place: &str,
    duration: &str,
    transport: &str,
) -> fmt::Result {
    writeln!(f, "  {label}: {place} ({duration})")?;
    writeln!(f, "    Food: {meal}")?;
    writeln!(f, "    Next: {transport}")
}

/// `what_to_pack` -> `What to pack`
fn section_heading(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
