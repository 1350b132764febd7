//! The program entry data model shared by the daily timeline and the calendar
//! views.
//!
//! An entry's `time` is kept as the raw string the caller supplied. Two forms
//! exist and are not interchangeable:
//!
//! - a bare clock time (`"08:00"`) used by single-day timelines, and
//! - an ISO-8601 date-time (`"2024-01-15T08:00"`) used by calendar and export
//!   views.
//!
//! [`EntryTime::classify`] tells them apart and [`ScheduleMode::detect`]
//! checks that a whole list uses one form.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::{time_to_minutes, window_for, ClockWindow};
use crate::error::EpgError;

/// Opaque entry identifier. Assigned once, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Origin of the scheduled content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramKind {
    Recorded,
    Live,
}

/// Broadcast state of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramStatus {
    Live,
    #[default]
    Scheduled,
    Completed,
    Offline,
}

/// A single scheduled broadcast block.
///
/// No overlap checking happens anywhere in this crate; entries are displayed
/// exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramEntry {
    pub id: EntryId,
    /// Bare `HH:MM` or ISO-8601 date-time; see [`EntryTime`].
    pub time: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ProgramKind,
    /// Minutes. Zero marks a placeholder such as an outage.
    pub duration: u32,
    #[serde(default)]
    pub geo_zone: String,
    #[serde(default)]
    pub status: ProgramStatus,
    #[serde(default)]
    pub genre: String,
}

/// The user-editable fields of an entry, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDraft {
    pub time: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ProgramKind,
    pub duration: u32,
    #[serde(default)]
    pub geo_zone: String,
    #[serde(default)]
    pub status: ProgramStatus,
    #[serde(default)]
    pub genre: String,
}

impl ProgramEntry {
    pub fn from_draft(id: EntryId, draft: ProgramDraft) -> Self {
        Self {
            id,
            time: draft.time,
            title: draft.title,
            kind: draft.kind,
            duration: draft.duration,
            geo_zone: draft.geo_zone,
            status: draft.status,
            genre: draft.genre,
        }
    }

    /// True for zero-length entries (outages and other non-program markers).
    pub fn is_placeholder(&self) -> bool {
        self.duration == 0
    }

    pub fn time_form(&self) -> Result<EntryTime, EpgError> {
        EntryTime::classify(&self.time)
    }

    /// Display window of this entry on its day.
    ///
    /// For timestamp entries the `HH:MM` portion after the date is used.
    pub fn clock_window(&self) -> Result<ClockWindow, EpgError> {
        let clock = match self.time_form()? {
            EntryTime::Clock(_) => self.time.as_str(),
            EntryTime::Timestamp(_) => self.time.get(11..16).ok_or_else(|| {
                EpgError::InvalidClock(format!("'{}': no time of day", self.time))
            })?,
        };
        window_for(clock, self.duration)
    }
}

// ── EntryTime ───────────────────────────────────────────────────────────────

/// The two forms an entry's `time` string can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryTime {
    /// Bare clock time, as minutes since midnight.
    Clock(u32),
    /// ISO-8601 date or date-time; only the date is retained.
    Timestamp(NaiveDate),
}

impl EntryTime {
    /// Classify a raw `time` string.
    ///
    /// Strings that begin with a `YYYY-MM-DD` date followed by nothing, `T`,
    /// or a space are timestamps. Anything else must be a clock time.
    ///
    /// # Errors
    ///
    /// Returns [`EpgError::InvalidClock`] if the string is neither form.
    pub fn classify(raw: &str) -> Result<Self, EpgError> {
        let raw = raw.trim();
        if let Some(date) = raw
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        {
            if matches!(raw.as_bytes().get(10), None | Some(b'T') | Some(b' ')) {
                return Ok(EntryTime::Timestamp(date));
            }
        }
        time_to_minutes(raw).map(EntryTime::Clock)
    }

    pub fn mode(&self) -> ScheduleMode {
        match self {
            EntryTime::Clock(_) => ScheduleMode::Clock,
            EntryTime::Timestamp(_) => ScheduleMode::Timestamp,
        }
    }
}

// ── ScheduleMode ────────────────────────────────────────────────────────────

/// Which time form an entire entry list uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleMode {
    Clock,
    Timestamp,
}

impl ScheduleMode {
    /// Determine the mode of a list. Returns `None` for an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`EpgError::MixedTimeModes`] if clock and timestamp entries
    /// are mixed, or the classification error of the first unparseable entry.
    pub fn detect(entries: &[ProgramEntry]) -> Result<Option<Self>, EpgError> {
        let mut mode: Option<(ScheduleMode, EntryId)> = None;
        for entry in entries {
            let this = entry.time_form()?.mode();
            match mode {
                None => mode = Some((this, entry.id)),
                Some((first, first_id)) if first != this => {
                    return Err(EpgError::MixedTimeModes(format!(
                        "entry {first_id} is {first:?} but entry {} is {this:?}",
                        entry.id
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(mode.map(|(m, _)| m))
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
