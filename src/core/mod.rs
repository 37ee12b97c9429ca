//! Turning free-form model output into fixed-shape itineraries.

pub mod extractor;
pub(crate) mod fields;
pub mod images;
pub mod normalizer;
pub mod pipeline;
pub mod planner;
pub mod sections;
pub(crate) mod shape;

pub use extractor::{extract_structured_object, find_object_span, strip_code_fence, ObjectSpan};
pub use images::{normalize_place_name, resolve_day_image};
pub use normalizer::{normalize_days, placeholder_day};
pub use pipeline::ItineraryPipeline;
pub use planner::ItineraryPlanner;
pub use sections::{extract_labeled_sections, SectionKey};
