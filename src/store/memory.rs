use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{new_entry_id, EntryStore, JournalState};
use crate::entry::{EntryDraft, EntryPatch, JournalEntry};
use crate::error::Result;

/// Keeps entries in process memory only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<JournalState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            state: RwLock::new(JournalState::new()),
        }
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn add(&self, draft: EntryDraft) -> Result<String> {
        let id = new_entry_id();
        self.state
            .write()
            .await
            .add_entry(JournalEntry::from_draft(id.clone(), draft));
        debug!(%id, "added entry");
        Ok(id)
    }

    async fn update(&self, id: &str, patch: EntryPatch) -> Result<bool> {
        let updated = self.state.write().await.update_entry(id, patch).is_some();
        if !updated {
            debug!(%id, "update ignored, no such entry");
        }
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.state.write().await.delete_entry(id))
    }

    async fn get_all(&self) -> Result<Vec<JournalEntry>> {
        Ok(self.state.read().await.sorted_entries())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<JournalEntry>> {
        Ok(self.state.read().await.get_entry(id).cloned())
    }

    async fn clear(&self) -> Result<()> {
        self.state.write().await.clear();
        Ok(())
    }
}
