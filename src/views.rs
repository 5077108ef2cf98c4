use crate::entry::JournalEntry;

/// Map centre used when no entry carries coordinates.
pub const DEFAULT_MAP_CENTER: (f64, f64) = (-6.2, 106.8167);

/// Entries that have a photo attached, in the order given.
pub fn media_entries(entries: &[JournalEntry]) -> Vec<JournalEntry> {
    entries
        .iter()
        .filter(|e| e.photo().is_some())
        .cloned()
        .collect()
}

pub fn located_entries(entries: &[JournalEntry]) -> Vec<JournalEntry> {
    entries.iter().filter(|e| e.has_location).cloned().collect()
}

/// Coordinates of the first located entry that has them.
pub fn map_center(entries: &[JournalEntry]) -> (f64, f64) {
    entries
        .iter()
        .filter(|e| e.has_location)
        .find_map(JournalEntry::coordinates)
        .unwrap_or(DEFAULT_MAP_CENTER)
}

pub fn search(entries: &[JournalEntry], query: &str) -> Vec<JournalEntry> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    entries
        .iter()
        .filter(|e| {
            e.content.to_lowercase().contains(&query)
                || e
                    .location_name
                    .as_ref()
                    .is_some_and(|n| n.to_lowercase().contains(&query))
        })
        .cloned()
        .collect()
}
