use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{JournalError, Result};
use crate::store::{EntryStore, LocalStore, MemoryStore, RemoteConfig, RemoteStore};

pub const DEFAULT_DOCUMENT_URL: &str = "http://localhost:8080";
pub const DEFAULT_STORAGE_URL: &str = "http://localhost:9199";
pub const DEFAULT_PROJECT: &str = "ujournal";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub enum Backend {
    Memory,
    Local,
    Remote(RemoteConfig),
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Memory => "memory",
            Backend::Local => "local",
            Backend::Remote(_) => "remote",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend: Backend,
    /// Holds the local journal file, imported photos and the log file.
    pub data_dir: PathBuf,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from `UJOURNAL_*` variables looked up through `var`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let data_dir = match get("UJOURNAL_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .ok_or_else(|| JournalError::Config("no data directory; set UJOURNAL_DATA_DIR".into()))?
                .join("ujournal"),
        };

        let backend = match get("UJOURNAL_BACKEND").as_deref().unwrap_or("local") {
            "memory" => Backend::Memory,
            "local" => Backend::Local,
            "remote" => {
                let project_id = get("UJOURNAL_PROJECT").unwrap_or_else(|| DEFAULT_PROJECT.to_string());
                Backend::Remote(RemoteConfig {
                    document_url: get("UJOURNAL_DOCUMENT_URL")
                        .unwrap_or_else(|| DEFAULT_DOCUMENT_URL.to_string()),
                    storage_url: get("UJOURNAL_STORAGE_URL")
                        .unwrap_or_else(|| DEFAULT_STORAGE_URL.to_string()),
                    bucket: get("UJOURNAL_BUCKET")
                        .unwrap_or_else(|| format!("{project_id}.appspot.com")),
                    auth_token: get("UJOURNAL_AUTH_TOKEN"),
                    project_id,
                })
            }
            other => {
                return Err(JournalError::Config(format!(
                    "unknown backend {other:?}, expected memory, local or remote"
                )))
            }
        };

        Ok(Config {
            backend,
            data_dir,
            log_filter: get("UJOURNAL_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    /// Opens the configured backend. Remote stores are filled before returning.
    pub async fn open_store(&self) -> Result<Arc<dyn EntryStore>> {
        let store: Arc<dyn EntryStore> = match &self.backend {
            Backend::Memory => Arc::new(MemoryStore::new()),
            Backend::Local => Arc::new(LocalStore::open(&self.data_dir).await?),
            Backend::Remote(remote) => {
                let store = RemoteStore::new(remote.clone())?;
                store.refresh().await?;
                Arc::new(store)
            }
        };
        Ok(store)
    }
}
