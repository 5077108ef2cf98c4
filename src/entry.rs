use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{JournalError, Result};

/// Where an attached photo lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRef {
    Local(PathBuf),
    Remote(String),
}

impl ImageRef {
    pub fn display(&self) -> String {
        match self {
            ImageRef::Local(path) => path.display().to_string(),
            ImageRef::Remote(url) => url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub has_image: bool,
    pub image: Option<ImageRef>,
    pub has_location: bool,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl JournalEntry {
    pub fn from_draft(id: String, draft: EntryDraft) -> Self {
        JournalEntry {
            id,
            content: draft.content,
            timestamp: draft.timestamp,
            has_image: draft.has_image,
            image: draft.image,
            has_location: draft.has_location,
            location_name: draft.location_name,
            latitude: draft.latitude,
            longitude: draft.longitude,
        }
    }

    /// Returns a new record with every field set in `patch` replaced.
    pub fn patched(&self, patch: EntryPatch) -> Self {
        JournalEntry {
            id: self.id.clone(),
            content: patch.content.unwrap_or_else(|| self.content.clone()),
            timestamp: patch.timestamp.unwrap_or(self.timestamp),
            has_image: patch.has_image.unwrap_or(self.has_image),
            image: patch.image.or_else(|| self.image.clone()),
            has_location: patch.has_location.unwrap_or(self.has_location),
            location_name: patch
                .location_name
                .unwrap_or_else(|| self.location_name.clone()),
            latitude: patch.latitude.unwrap_or(self.latitude),
            longitude: patch.longitude.unwrap_or(self.longitude),
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// The attached photo, only when the entry is flagged as having one.
    pub fn photo(&self) -> Option<&ImageRef> {
        if self.has_image {
            self.image.as_ref()
        } else {
            None
        }
    }

    pub fn headline(&self) -> &str {
        self.content.lines().next().unwrap_or("")
    }
}

/// Input to [`crate::store::EntryStore::add`]. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub has_image: bool,
    pub image: Option<ImageRef>,
    pub has_location: bool,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl EntryDraft {
    pub fn new(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        EntryDraft {
            content: content.into(),
            timestamp,
            has_image: false,
            image: None,
            has_location: false,
            location_name: None,
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_image(mut self, image: ImageRef) -> Self {
        self.has_image = true;
        self.image = Some(image);
        self
    }

    pub fn with_location(
        mut self,
        name: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Self {
        self.has_location = true;
        self.location_name = name;
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(JournalError::BlankContent);
        }
        check_location(
            self.has_location,
            self.location_name.as_deref(),
            self.latitude,
            self.longitude,
        )
    }
}

/// Input to [`crate::store::EntryStore::update`]. `None` keeps the previous
/// value. The place fields can also be cleared with `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub content: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub has_image: Option<bool>,
    pub image: Option<ImageRef>,
    pub has_location: Option<bool>,
    pub location_name: Option<Option<String>>,
    pub latitude: Option<Option<f64>>,
    pub longitude: Option<Option<f64>>,
}

impl EntryPatch {
    pub fn content(content: impl Into<String>) -> Self {
        EntryPatch {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Checks the patch against the record it would be applied to.
    pub fn validate_against(&self, current: &JournalEntry) -> Result<()> {
        if let Some(content) = &self.content {
            if content.trim().is_empty() {
                return Err(JournalError::BlankContent);
            }
        }
        let merged = current.patched(self.clone());
        check_location(
            merged.has_location,
            merged.location_name.as_deref(),
            merged.latitude,
            merged.longitude,
        )
    }
}

fn check_location(
    has_location: bool,
    name: Option<&str>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<()> {
    if !has_location {
        return Ok(());
    }
    let named = name.map(|n| !n.trim().is_empty()).unwrap_or(false);
    let placed = latitude.is_some() && longitude.is_some();
    if named || placed {
        Ok(())
    } else {
        Err(JournalError::IncompleteLocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, h, 0, 0).unwrap()
    }

    #[test]
    fn patch_keeps_unspecified_fields() {
        let draft = EntryDraft::new("hello", at(9))
            .with_image(ImageRef::Remote("https://img/1.jpg".into()))
            .with_location(Some("Jakarta".into()), Some(-6.2), Some(106.8));
        let entry = JournalEntry::from_draft("a".into(), draft);

        let updated = entry.patched(EntryPatch::content("changed"));

        assert_eq!(updated.content, "changed");
        assert_eq!(updated.timestamp, entry.timestamp);
        assert_eq!(updated.image, entry.image);
        assert_eq!(updated.location_name.as_deref(), Some("Jakarta"));
        assert_eq!(updated.coordinates(), Some((-6.2, 106.8)));
    }

    #[test]
    fn patch_can_clear_the_place_name() {
        let draft = EntryDraft::new("hello", at(9))
            .with_location(Some("Home".into()), Some(-6.2), Some(106.8));
        let entry = JournalEntry::from_draft("a".into(), draft);

        let patch = EntryPatch {
            location_name: Some(None),
            ..Default::default()
        };
        assert!(patch.validate_against(&entry).is_ok());
        let updated = entry.patched(patch);

        assert_eq!(updated.location_name, None);
        assert_eq!(updated.coordinates(), Some((-6.2, 106.8)));
        assert!(updated.has_location);
    }

    #[test]
    fn clearing_every_place_field_fails_validation() {
        let draft = EntryDraft::new("hello", at(9)).with_location(Some("Home".into()), None, None);
        let entry = JournalEntry::from_draft("a".into(), draft);
        let patch = EntryPatch {
            location_name: Some(None),
            ..Default::default()
        };
        assert!(matches!(
            patch.validate_against(&entry),
            Err(JournalError::IncompleteLocation)
        ));
    }

    #[test]
    fn blank_content_is_rejected() {
        let err = EntryDraft::new("   \n", at(9)).validate().unwrap_err();
        assert!(matches!(err, JournalError::BlankContent));
    }

    #[test]
    fn location_needs_name_or_both_coordinates() {
        let missing = EntryDraft::new("x", at(9)).with_location(None, Some(1.0), None);
        assert!(matches!(
            missing.validate(),
            Err(JournalError::IncompleteLocation)
        ));

        let named = EntryDraft::new("x", at(9)).with_location(Some("Home".into()), None, None);
        assert!(named.validate().is_ok());

        let placed = EntryDraft::new("x", at(9)).with_location(None, Some(1.0), Some(2.0));
        assert!(placed.validate().is_ok());
    }

    #[test]
    fn patch_validation_sees_merged_record() {
        let entry = JournalEntry::from_draft("a".into(), EntryDraft::new("x", at(9)));
        let patch = EntryPatch {
            has_location: Some(true),
            ..Default::default()
        };
        assert!(patch.validate_against(&entry).is_err());
    }

    #[test]
    fn photo_requires_flag() {
        let mut entry = JournalEntry::from_draft(
            "a".into(),
            EntryDraft::new("x", at(9)).with_image(ImageRef::Local("/tmp/p.jpg".into())),
        );
        assert!(entry.photo().is_some());
        entry.has_image = false;
        assert!(entry.photo().is_none());
    }
}
