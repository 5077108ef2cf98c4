use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{new_entry_id, EntryStore, JournalState};
use crate::entry::{EntryDraft, EntryPatch, ImageRef, JournalEntry};
use crate::error::Result;

const JOURNAL_FILE: &str = "journal_entries.json";
const IMAGE_DIR: &str = "images";

/// Keeps the journal in a JSON file inside `dir`, rewritten after every
/// mutation. A mutation only becomes visible once the file has been written.
/// Attached photos are copied into `dir/images/`.
#[derive(Debug)]
pub struct LocalStore {
    dir: PathBuf,
    state: RwLock<JournalState>,
}

impl LocalStore {
    /// Opens the journal in `dir`, starting an empty one if no file exists yet.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(dir.join(IMAGE_DIR)).await?;

        let state = match load_from_file(&dir.join(JOURNAL_FILE)).await {
            Ok(state) => {
                info!(path = %dir.display(), entries = state.len(), "loaded journal");
                state
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %dir.display(), "no existing journal file, starting a new one");
                JournalState::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(LocalStore {
            dir,
            state: RwLock::new(state),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn save_to_file(&self, state: &JournalState) -> Result<()> {
        let serialized = serde_json::to_string_pretty(state)?;
        let path = self.dir.join(JOURNAL_FILE);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serialized).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    fn image_path(&self, id: &str) -> PathBuf {
        self.dir.join(IMAGE_DIR).join(format!("{id}.jpg"))
    }

    /// Copies a photo from elsewhere on disk into the image directory.
    /// Remote references and photos already imported are returned unchanged.
    async fn import_image(&self, id: &str, image: ImageRef) -> Result<ImageRef> {
        match image {
            ImageRef::Local(source) if !source.starts_with(self.dir.join(IMAGE_DIR)) => {
                let target = self.image_path(id);
                fs::copy(&source, &target).await?;
                debug!(from = %source.display(), to = %target.display(), "imported image");
                Ok(ImageRef::Local(target))
            }
            other => Ok(other),
        }
    }

    async fn remove_image(&self, image: Option<&ImageRef>) {
        let Some(ImageRef::Local(path)) = image else {
            return;
        };
        if !path.starts_with(self.dir.join(IMAGE_DIR)) {
            return;
        }
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "failed to remove image");
            }
        }
    }
}

async fn load_from_file(path: &Path) -> std::io::Result<JournalState> {
    let serialized = fs::read_to_string(path).await?;
    serde_json::from_str(&serialized).map_err(std::io::Error::from)
}

#[async_trait]
impl EntryStore for LocalStore {
    async fn add(&self, mut draft: EntryDraft) -> Result<String> {
        let id = new_entry_id();
        if let Some(image) = draft.image.take() {
            draft.image = Some(self.import_image(&id, image).await?);
        }

        let mut state = self.state.write().await;
        let mut next = state.clone();
        next.add_entry(JournalEntry::from_draft(id.clone(), draft));
        self.save_to_file(&next).await?;
        *state = next;
        debug!(%id, "added entry");
        Ok(id)
    }

    async fn update(&self, id: &str, mut patch: EntryPatch) -> Result<bool> {
        if !self.state.read().await.contains(id) {
            debug!(%id, "update ignored, no such entry");
            return Ok(false);
        }
        if let Some(image) = patch.image.take() {
            patch.image = Some(self.import_image(id, image).await?);
        }

        let mut state = self.state.write().await;
        let mut next = state.clone();
        if next.update_entry(id, patch).is_none() {
            return Ok(false);
        }
        self.save_to_file(&next).await?;
        *state = next;
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        let image = state.get_entry(id).and_then(|e| e.image.clone());
        let mut next = state.clone();
        if !next.delete_entry(id) {
            return Ok(false);
        }
        self.save_to_file(&next).await?;
        *state = next;
        drop(state);
        self.remove_image(image.as_ref()).await;
        Ok(true)
    }

    async fn get_all(&self) -> Result<Vec<JournalEntry>> {
        Ok(self.state.read().await.sorted_entries())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<JournalEntry>> {
        Ok(self.state.read().await.get_entry(id).cloned())
    }

    async fn clear(&self) -> Result<()> {
        let mut state = self.state.write().await;
        self.save_to_file(&JournalState::new()).await?;
        state.clear();
        Ok(())
    }
}
