mod form;
mod ui;

use chrono::Local;
use color_eyre::eyre::{eyre, Result};
use tracing::{error, info};
use ujournal::config::Config;
use ujournal::photo::{fetch_photo, MAX_PHOTO_BYTES};
use ujournal::{logging, EntryDraft, EntryPatch, Journal, JournalEntry};

use form::EntryForm;
use ui::{Action, UI};

fn draft_from(form: &EntryForm) -> std::result::Result<EntryDraft, String> {
    let draft = form.to_draft(&Local).map_err(|e| e.to_string())?;
    draft.validate().map_err(|e| e.to_string())?;
    Ok(draft)
}

fn patch_from(form: &EntryForm, original: &JournalEntry) -> std::result::Result<EntryPatch, String> {
    let patch = form.to_patch(original, &Local).map_err(|e| e.to_string())?;
    patch.validate_against(original).map_err(|e| e.to_string())?;
    Ok(patch)
}

/// Opens an entry, describing its photo when one is attached.
async fn open_entry(ui: &mut UI, client: &reqwest::Client, entry: &JournalEntry) -> Result<()> {
    let note = match entry.photo() {
        Some(image) => Some(match fetch_photo(client, image, MAX_PHOTO_BYTES).await {
            Ok(bytes) => format!("Photo loaded, {} KiB", bytes.len().div_ceil(1024)),
            Err(e) => format!("Photo unavailable: {e}"),
        }),
        None => None,
    };
    ui.view_full_entry(entry, note.as_deref())
}

/// Store failures are shown to the user instead of ending the session.
fn report<T>(ui: &mut UI, what: &str, result: ujournal::Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            error!(error = %e, "{what} failed");
            ui.set_status(format!("{what} failed: {e}"));
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::from_env()?;
    logging::init(&config.data_dir, &config.log_filter)?;
    info!(backend = config.backend.name(), data_dir = %config.data_dir.display(), "starting");

    let store = config
        .open_store()
        .await
        .map_err(|e| eyre!("Failed to open journal: {}", e))?;
    let journal = Journal::new(store);
    let client = reqwest::Client::new();
    let mut ui = UI::new()?;

    loop {
        let entries = report(&mut ui, "Loading entries", journal.entries().await).unwrap_or_default();
        ui.display(&entries)?;

        let Some(action) = ui.handle_input(&entries)? else {
            continue;
        };
        match action {
            Action::Write => {
                if let Some(draft) = ui.edit_form("New Entry", EntryForm::blank(Local::now()), draft_from)? {
                    report(&mut ui, "Saving entry", journal.add(draft).await);
                }
            }
            Action::View => {
                if let Some(entry) = ui.selected(&entries) {
                    open_entry(&mut ui, &client, entry).await?;
                }
            }
            Action::Edit => {
                if let Some(entry) = ui.selected(&entries).cloned() {
                    let form = EntryForm::from_entry(&entry, &Local);
                    if let Some(patch) = ui.edit_form("Edit Entry", form, |f| patch_from(f, &entry))? {
                        if report(&mut ui, "Updating entry", journal.update(&entry.id, patch).await) == Some(false) {
                            ui.set_status("That entry no longer exists");
                        }
                    }
                }
            }
            Action::Delete => {
                if let Some(entry) = ui.selected(&entries).cloned() {
                    let question = format!("Delete \"{}\"?", entry.headline());
                    if ui.confirm(&question)? {
                        report(&mut ui, "Deleting entry", journal.delete(&entry.id).await);
                    }
                }
            }
            Action::Search => {
                if let Some(query) = ui.get_search_query()? {
                    if let Some(results) = report(&mut ui, "Searching", journal.search(&query).await) {
                        let title = format!("Results for \"{}\"", query.trim());
                        if let Some(entry) = ui.pick_entry(&title, "Results", &results)? {
                            open_entry(&mut ui, &client, &entry).await?;
                        }
                    }
                }
            }
            Action::Calendar => {
                if let Some(entry) = ui.calendar(&entries)? {
                    open_entry(&mut ui, &client, &entry).await?;
                }
            }
            Action::Media => {
                if let Some(media) = report(&mut ui, "Loading media", journal.media().await) {
                    if let Some(entry) = ui.pick_entry("Media", "Entries with photos", &media)? {
                        open_entry(&mut ui, &client, &entry).await?;
                    }
                }
            }
            Action::Atlas => {
                if let Some((located, (lat, lon))) = report(&mut ui, "Loading atlas", journal.atlas().await) {
                    let heading = format!("Places (map centre {lat:.4}, {lon:.4})");
                    if let Some(entry) = ui.pick_entry("Atlas", &heading, &located)? {
                        open_entry(&mut ui, &client, &entry).await?;
                    }
                }
            }
            Action::Refresh => {
                if report(&mut ui, "Refreshing", journal.refresh().await).is_some() {
                    ui.set_status("Journal refreshed");
                }
            }
            Action::Quit => break,
        }
    }

    Ok(())
}
