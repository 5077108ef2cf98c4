//! Calendar bucketing: which days of a month carry entries, which entries
//! fall on a given day, and the Sunday-first grid the calendar view draws.
//!
//! Calendar days are evaluated in a caller-supplied time zone, so the same
//! instant can land on different days for different users.

use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Utc};
use std::collections::BTreeSet;

use crate::entry::JournalEntry;

fn local_date<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    timestamp.with_timezone(tz).date_naive()
}

/// Day-of-month numbers in `year`/`month` that have at least one entry.
pub fn days_with_entries<Tz: TimeZone>(
    entries: &[JournalEntry],
    year: i32,
    month: u32,
    tz: &Tz,
) -> BTreeSet<u32> {
    entries
        .iter()
        .map(|e| local_date(&e.timestamp, tz))
        .filter(|d| d.year() == year && d.month() == month)
        .map(|d| d.day())
        .collect()
}

/// Entries whose timestamp falls on `date`, in the order given.
pub fn entries_on_date<Tz: TimeZone>(
    entries: &[JournalEntry],
    date: NaiveDate,
    tz: &Tz,
) -> Vec<JournalEntry> {
    entries
        .iter()
        .filter(|e| local_date(&e.timestamp, tz) == date)
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    /// `None` unless `month` is 1 through 12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| CalendarMonth { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        CalendarMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("CalendarMonth holds a valid year and month")
    }

    pub fn previous(&self) -> Self {
        Self::containing(self.first_day() - Months::new(1))
    }

    pub fn next(&self) -> Self {
        Self::containing(self.first_day() + Months::new(1))
    }

    pub fn days_in_month(&self) -> u32 {
        let next = self.next().first_day();
        next.signed_duration_since(self.first_day()).num_days() as u32
    }

    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// e.g. "January 2024".
    pub fn title(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub type Week = [Option<u32>; 7];

/// Rows of day numbers starting on Sunday. Cells before the first and after
/// the last day are `None`; no row is entirely empty.
pub fn month_grid(month: CalendarMonth) -> Vec<Week> {
    let offset = month.first_day().weekday().num_days_from_sunday() as usize;
    let days = month.days_in_month();

    let mut weeks = Vec::with_capacity(6);
    let mut week: Week = [None; 7];
    let mut column = offset;
    for day in 1..=days {
        week[column] = Some(day);
        column += 1;
        if column == 7 {
            weeks.push(week);
            week = [None; 7];
            column = 0;
        }
    }
    if column > 0 {
        weeks.push(week);
    }
    weeks
}
