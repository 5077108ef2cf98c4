//! # Entry storage
//!
//! One capability set for every persistence backend. The journal service only
//! talks to [`EntryStore`], so the in-memory, on-disk and remote backends can
//! be swapped without touching callers.

mod local;
mod memory;
mod remote;
mod state;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use remote::{RemoteConfig, RemoteStore};
pub use state::JournalState;

use async_trait::async_trait;

use crate::entry::{EntryDraft, EntryPatch, JournalEntry};
use crate::error::Result;

#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Store a new entry and return the id assigned to it.
    async fn add(&self, draft: EntryDraft) -> Result<String>;

    /// Replace the entry with `id`, keeping every field the patch leaves unset.
    /// Returns `false` and changes nothing if no such entry exists.
    async fn update(&self, id: &str, patch: EntryPatch) -> Result<bool>;

    /// Returns `false` if no entry with `id` existed.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// All entries, most recent first. Entries with equal timestamps keep
    /// their insertion order.
    async fn get_all(&self) -> Result<Vec<JournalEntry>>;

    async fn get_by_id(&self, id: &str) -> Result<Option<JournalEntry>>;

    /// Reload from the backing store. Local backends have nothing to do.
    async fn refresh(&self) -> Result<()> {
        Ok(())
    }

    /// Drop every cached entry.
    async fn clear(&self) -> Result<()>;
}

pub(crate) fn new_entry_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
