use serde::{Deserialize, Serialize};

use crate::entry::{EntryPatch, JournalEntry};

/// The authoritative list of entries in insertion order. Every backend keeps
/// one of these; the local backend serializes it to disk as-is.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct JournalState {
    entries: Vec<JournalEntry>,
}

impl JournalState {
    pub fn new() -> Self {
        JournalState {
            entries: Vec::new(),
        }
    }

    pub fn add_entry(&mut self, entry: JournalEntry) {
        self.entries.push(entry);
    }

    /// Replaces the entry in place so its insertion position is kept.
    pub fn update_entry(&mut self, id: &str, patch: EntryPatch) -> Option<JournalEntry> {
        let entry = self.entries.iter_mut().find(|e| e.id == id)?;
        *entry = entry.patched(patch);
        Some(entry.clone())
    }

    pub fn delete_entry(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn get_entry(&self, id: &str) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get_entry(id).is_some()
    }

    /// Most recent first. `sort_by` is stable, so equal timestamps keep
    /// insertion order.
    pub fn sorted_entries(&self) -> Vec<JournalEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    pub fn replace_all(&mut self, entries: Vec<JournalEntry>) {
        self.entries = entries;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
