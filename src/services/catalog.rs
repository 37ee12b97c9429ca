use crate::{error::Result, types::PlaceCatalogEntry};
use std::{cmp::Ordering, path::Path};
use tracing::info;

/// Default number of catalog rows kept after ranking.
pub const DEFAULT_CATALOG_LIMIT: usize = 200;

/// Load a JSON array of catalog rows, best rated first, capped at `limit`.
pub fn load_catalog(path: impl AsRef<Path>, limit: usize) -> Result<Vec<PlaceCatalogEntry>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let entries = parse_catalog(&raw, limit)?;
    info!(
        target: "itinerary::catalog",
        path = %path.display(),
        entries = entries.len(),
        "catalog loaded"
    );
    Ok(entries)
}

pub fn parse_catalog(raw: &str, limit: usize) -> Result<Vec<PlaceCatalogEntry>> {
    let mut entries: Vec<PlaceCatalogEntry> = serde_json::from_str(raw)?;
    entries.retain(|entry| !entry.place.trim().is_empty());
    entries.sort_by(|a, b| by_rating_desc(a.rating, b.rating));
    entries.truncate(limit);
    Ok(entries)
}

fn by_rating_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
