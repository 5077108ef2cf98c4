//! Dated journal entries with optional photos and places, kept behind a
//! swappable store and viewed as a feed, a calendar, a media list or an atlas.

pub mod calendar;
pub mod config;
pub mod entry;
pub mod error;
pub mod journal;
pub mod logging;
pub mod photo;
pub mod store;
pub mod views;

pub use entry::{EntryDraft, EntryPatch, ImageRef, JournalEntry};
pub use error::{JournalError, Result};
pub use journal::Journal;
