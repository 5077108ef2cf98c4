use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;
use ujournal::{EntryDraft, EntryPatch, ImageRef, JournalEntry};

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

pub const CONTENT: usize = 0;
pub const DATE: usize = 1;
pub const PLACE: usize = 2;
pub const LATITUDE: usize = 3;
pub const LONGITUDE: usize = 4;
pub const PHOTO: usize = 5;

pub const LABELS: [&str; 6] = [
    "Content",
    "Date (YYYY-MM-DD HH:MM)",
    "Place",
    "Latitude",
    "Longitude",
    "Photo (path or URL)",
];

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("date must look like 2024-01-31 18:45")]
    Date,
    #[error("{0} must be a number")]
    Number(&'static str),
    #[error("latitude and longitude go together")]
    HalfCoordinates,
}

/// Raw text of the entry editor, one string per field.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryForm {
    pub fields: [String; 6],
}

impl EntryForm {
    pub fn blank<Tz: TimeZone>(now: DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let mut fields: [String; 6] = Default::default();
        fields[DATE] = now.format(DATE_FORMAT).to_string();
        EntryForm { fields }
    }

    pub fn from_entry<Tz: TimeZone>(entry: &JournalEntry, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let mut fields: [String; 6] = Default::default();
        fields[CONTENT] = entry.content.clone();
        fields[DATE] = entry.timestamp.with_timezone(tz).format(DATE_FORMAT).to_string();
        if entry.has_location {
            fields[PLACE] = entry.location_name.clone().unwrap_or_default();
            fields[LATITUDE] = entry.latitude.map(|v| v.to_string()).unwrap_or_default();
            fields[LONGITUDE] = entry.longitude.map(|v| v.to_string()).unwrap_or_default();
        }
        if let Some(image) = entry.photo() {
            fields[PHOTO] = image.display();
        }
        EntryForm { fields }
    }

    fn timestamp<Tz: TimeZone>(&self, tz: &Tz) -> Result<DateTime<Utc>, FormError> {
        let naive = NaiveDateTime::parse_from_str(self.fields[DATE].trim(), DATE_FORMAT)
            .map_err(|_| FormError::Date)?;
        tz.from_local_datetime(&naive)
            .earliest()
            .map(|t| t.with_timezone(&Utc))
            .ok_or(FormError::Date)
    }

    fn coordinates(&self) -> Result<(Option<f64>, Option<f64>), FormError> {
        let parse = |index: usize, name: &'static str| {
            let raw = self.fields[index].trim();
            if raw.is_empty() {
                Ok(None)
            } else {
                raw.parse::<f64>().map(Some).map_err(|_| FormError::Number(name))
            }
        };
        match (parse(LATITUDE, "latitude")?, parse(LONGITUDE, "longitude")?) {
            (Some(_), None) | (None, Some(_)) => Err(FormError::HalfCoordinates),
            pair => Ok(pair),
        }
    }

    fn place(&self) -> Option<String> {
        let place = self.fields[PLACE].trim();
        (!place.is_empty()).then(|| place.to_string())
    }

    fn photo(&self) -> Option<ImageRef> {
        let raw = self.fields[PHOTO].trim();
        if raw.is_empty() {
            None
        } else if raw.starts_with("http://") || raw.starts_with("https://") {
            Some(ImageRef::Remote(raw.to_string()))
        } else {
            Some(ImageRef::Local(raw.into()))
        }
    }

    pub fn to_draft<Tz: TimeZone>(&self, tz: &Tz) -> Result<EntryDraft, FormError> {
        let mut draft = EntryDraft::new(self.fields[CONTENT].clone(), self.timestamp(tz)?);
        let (latitude, longitude) = self.coordinates()?;
        let place = self.place();
        if place.is_some() || latitude.is_some() {
            draft = draft.with_location(place, latitude, longitude);
        }
        if let Some(photo) = self.photo() {
            draft = draft.with_image(photo);
        }
        Ok(draft)
    }

    /// Only fields that differ from `original` end up in the patch.
    pub fn to_patch<Tz: TimeZone>(&self, original: &JournalEntry, tz: &Tz) -> Result<EntryPatch, FormError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let edited = self.to_draft(tz)?;
        let mut patch = EntryPatch::default();

        if edited.content != original.content {
            patch.content = Some(edited.content);
        }
        // The field only shows minutes, so compare what was shown.
        let shown = original.timestamp.with_timezone(tz).format(DATE_FORMAT).to_string();
        if self.fields[DATE].trim() != shown {
            patch.timestamp = Some(edited.timestamp);
        }
        if edited.has_location != original.has_location {
            patch.has_location = Some(edited.has_location);
        }
        if edited.has_location {
            if edited.location_name != original.location_name {
                patch.location_name = Some(edited.location_name);
            }
            if edited.latitude != original.latitude {
                patch.latitude = Some(edited.latitude);
            }
            if edited.longitude != original.longitude {
                patch.longitude = Some(edited.longitude);
            }
        }
        if edited.has_image != original.has_image {
            patch.has_image = Some(edited.has_image);
        }
        if edited.image.is_some() && edited.image.as_ref() != original.photo() {
            patch.image = edited.image;
        }
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn form(pairs: &[(usize, &str)]) -> EntryForm {
        let mut form = EntryForm::blank(Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap());
        for (index, value) in pairs {
            form.fields[*index] = value.to_string();
        }
        form
    }

    #[test]
    fn date_is_read_in_the_given_zone() {
        let plus7 = FixedOffset::east_opt(7 * 3600).unwrap();
        let draft = form(&[(CONTENT, "x"), (DATE, "2024-01-11 06:30")])
            .to_draft(&plus7)
            .unwrap();
        assert_eq!(draft.timestamp, Utc.with_ymd_and_hms(2024, 1, 10, 23, 30, 0).unwrap());
    }

    #[test]
    fn bad_fields_are_reported() {
        assert_eq!(form(&[(DATE, "yesterday")]).to_draft(&Utc), Err(FormError::Date));
        assert_eq!(
            form(&[(LATITUDE, "north")]).to_draft(&Utc),
            Err(FormError::Number("latitude"))
        );
        assert_eq!(
            form(&[(LATITUDE, "1.5")]).to_draft(&Utc),
            Err(FormError::HalfCoordinates)
        );
    }

    #[test]
    fn place_and_photo_set_their_flags() {
        let draft = form(&[
            (CONTENT, "x"),
            (PLACE, "Monas"),
            (PHOTO, "https://cdn/p.jpg"),
        ])
        .to_draft(&Utc)
        .unwrap();
        assert!(draft.has_location);
        assert_eq!(draft.location_name.as_deref(), Some("Monas"));
        assert_eq!(draft.image, Some(ImageRef::Remote("https://cdn/p.jpg".into())));

        let plain = form(&[(CONTENT, "x")]).to_draft(&Utc).unwrap();
        assert!(!plain.has_location && !plain.has_image);
    }

    #[test]
    fn unchanged_form_yields_empty_patch() {
        let entry = JournalEntry::from_draft(
            "e".into(),
            form(&[(CONTENT, "hello"), (PLACE, "Home"), (LATITUDE, "1"), (LONGITUDE, "2")])
                .to_draft(&Utc)
                .unwrap(),
        );
        let edit = EntryForm::from_entry(&entry, &Utc);
        assert_eq!(edit.to_patch(&entry, &Utc).unwrap(), EntryPatch::default());

        let mut changed = edit.clone();
        changed.fields[CONTENT] = "hello again".into();
        changed.fields[PLACE].clear();
        changed.fields[LATITUDE].clear();
        changed.fields[LONGITUDE].clear();
        let patch = changed.to_patch(&entry, &Utc).unwrap();
        assert_eq!(patch.content.as_deref(), Some("hello again"));
        assert_eq!(patch.has_location, Some(false));
    }

    #[test]
    fn content_edit_keeps_seconds_of_the_stored_time() {
        let entry = JournalEntry::from_draft(
            "e".into(),
            EntryDraft::new("hello", Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 37).unwrap()),
        );
        let mut edit = EntryForm::from_entry(&entry, &Utc);
        edit.fields[CONTENT] = "hello again".into();

        let patch = edit.to_patch(&entry, &Utc).unwrap();
        assert_eq!(patch.timestamp, None);
        assert_eq!(entry.patched(patch).timestamp, entry.timestamp);

        edit.fields[DATE] = "2024-01-10 10:15".into();
        let patch = edit.to_patch(&entry, &Utc).unwrap();
        assert_eq!(patch.timestamp, Some(Utc.with_ymd_and_hms(2024, 1, 10, 10, 15, 0).unwrap()));
    }

    #[test]
    fn clearing_the_place_keeps_the_coordinates() {
        let entry = JournalEntry::from_draft(
            "e".into(),
            form(&[(CONTENT, "hello"), (PLACE, "Home"), (LATITUDE, "1"), (LONGITUDE, "2")])
                .to_draft(&Utc)
                .unwrap(),
        );
        let mut edit = EntryForm::from_entry(&entry, &Utc);
        edit.fields[PLACE].clear();

        let patch = edit.to_patch(&entry, &Utc).unwrap();
        assert_eq!(patch.location_name, Some(None));
        assert!(patch.validate_against(&entry).is_ok());

        let updated = entry.patched(patch);
        assert_eq!(updated.location_name, None);
        assert_eq!(updated.coordinates(), Some((1.0, 2.0)));
    }
}
