use std::sync::Arc;
use tracing::info;

use crate::entry::{EntryDraft, EntryPatch, JournalEntry};
use crate::error::Result;
use crate::store::EntryStore;
use crate::views;

/// The journal a front-end works with: one injected store plus validation
/// and the queries behind each view.
#[derive(Clone)]
pub struct Journal {
    store: Arc<dyn EntryStore>,
}

impl Journal {
    pub fn new(store: Arc<dyn EntryStore>) -> Self {
        Journal { store }
    }

    pub async fn add(&self, draft: EntryDraft) -> Result<String> {
        draft.validate()?;
        let id = self.store.add(draft).await?;
        info!(%id, "created journal entry");
        Ok(id)
    }

    /// Returns `false` if the entry does not exist.
    pub async fn update(&self, id: &str, patch: EntryPatch) -> Result<bool> {
        let Some(current) = self.store.get_by_id(id).await? else {
            return Ok(false);
        };
        patch.validate_against(&current)?;
        self.store.update(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            info!(%id, "deleted journal entry");
        }
        Ok(deleted)
    }

    pub async fn entries(&self) -> Result<Vec<JournalEntry>> {
        self.store.get_all().await
    }

    pub async fn entry(&self, id: &str) -> Result<Option<JournalEntry>> {
        self.store.get_by_id(id).await
    }

    pub async fn refresh(&self) -> Result<()> {
        self.store.refresh().await
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.clear().await
    }

    pub async fn media(&self) -> Result<Vec<JournalEntry>> {
        Ok(views::media_entries(&self.entries().await?))
    }

    /// Located entries and the point the map should start on.
    pub async fn atlas(&self) -> Result<(Vec<JournalEntry>, (f64, f64))> {
        let entries = views::located_entries(&self.entries().await?);
        let center = views::map_center(&entries);
        Ok((entries, center))
    }

    pub async fn search(&self, query: &str) -> Result<Vec<JournalEntry>> {
        Ok(views::search(&self.entries().await?, query))
    }
}
