//! Day image lookup against the place catalog.

use crate::types::PlaceCatalogEntry;

/// Emphasis markup stripped from place names before matching.
const EMPHASIS_MARKERS: &[char] = &['*'];

/// Lower-cased, trimmed place name without emphasis markup.
pub fn normalize_place_name(name: &str) -> String {
    name.replace(EMPHASIS_MARKERS, "").trim().to_lowercase()
}

/// Resolve the illustrative image for a day from its morning place.
///
/// The first catalog entry whose name contains the normalized place wins. When
/// nothing matches, or the match carries no image, the first entry that has an
/// image is used instead.
pub fn resolve_day_image(morning_place: &str, catalog: &[PlaceCatalogEntry]) -> Option<String> {
    let wanted = normalize_place_name(morning_place);

    let matched = if wanted.is_empty() {
        None
    } else {
        catalog
            .iter()
            .find(|entry| entry.place.trim().to_lowercase().contains(&wanted))
    };

    matched
        .and_then(PlaceCatalogEntry::image)
        .or_else(|| catalog.iter().find_map(PlaceCatalogEntry::image))
        .map(str::to_string)
}
