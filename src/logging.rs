use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{JournalError, Result};

pub const LOG_FILE: &str = "ujournal.log";

/// Sends tracing output to `dir/ujournal.log`; the terminal belongs to the UI.
pub fn init(dir: &Path, filter: &str) -> Result<()> {
    fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    fmt()
        .with_env_filter(build_filter(filter)?)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| JournalError::Config(format!("logging already initialised: {e}")))
}

/// Only the configured directives count; the process environment is not read.
fn build_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| JournalError::Config(format!("invalid log filter {filter:?}: {e}")))
}
