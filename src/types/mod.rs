pub mod itinerary_types;
pub mod response;

pub use itinerary_types::{
    AfternoonBlock, DayRecord, EveningBlock, ExtraSections, MorningBlock, NormalizedItinerary,
    PlaceCatalogEntry,
};
pub use response::{decode_structured, decode_structured_str};
