//! itinerary-rs: turn free-form LLM travel plans into fixed-shape day records
//!
//! Model output is rarely clean JSON. This library pulls the first balanced
//! object out of the raw text, normalizes whatever day shape the model chose
//! into exactly the requested number of days, resolves a day image from the
//! place catalog, and recovers the closing sections from labeled headings.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use itinerary_rs::{ItineraryPipeline, PlaceCatalogEntry};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let raw = "Here is your plan:\n```json\n{\"days\": [{\"breakfast\": \"Pancakes $5\"}]}\n```";
//!     let catalog = vec![PlaceCatalogEntry::new("Grand Canyon Lodge").with_local_image("img1")];
//!
//!     let itinerary = ItineraryPipeline::default().run(raw, 3, &catalog)?;
//!     assert_eq!(itinerary.days.len(), 3);
//!     println!("{}", serde_json::to_string_pretty(&itinerary)?);
//!     Ok(())
//! }
//! ```

extern crate self as itinerary_rs;

pub mod config;
pub mod core;
pub mod error;
pub mod render;
pub mod schemas;
pub mod services;
pub mod types;

pub use config::{PipelineConfig, PlannerConfig};
pub use core::{
    extract_labeled_sections, extract_structured_object, normalize_days, ItineraryPipeline,
    ItineraryPlanner,
};
pub use error::{ItineraryError, Result};
pub use itinerary_macros::completion_schema;
pub use render::{ItineraryRenderer, JsonRenderer, RenderRequest, TextRenderer};
pub use schemas::{validate_itinerary, CompletionSchema, SchemaHandle};
pub use services::{
    load_catalog, ChatCompletionRequest, ImageCache, ModelClient, OpenAIClient, TripRequest,
};
pub use types::{DayRecord, ExtraSections, NormalizedItinerary, PlaceCatalogEntry};

pub use schemas as schema;

#[cfg(feature = "cli")]
pub mod cli;
