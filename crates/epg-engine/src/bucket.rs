//! Calendar bucketing for the daily, weekly, and monthly EPG views.
//!
//! Membership is a plain string-prefix test: an entry belongs to a day when its
//! `time` starts with that day's `YYYY-MM-DD`. Bare clock entries carry no date
//! and therefore never land in any bucket. Callers must bucket timestamp lists
//! only; use [`ScheduleMode::detect`](crate::program::ScheduleMode::detect) to
//! check a list first.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EpgError;
use crate::program::ProgramEntry;

// ── Options ─────────────────────────────────────────────────────────────────

/// First column of the weekly EPG grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStartDay {
    #[default]
    Monday,
    Sunday,
}

/// The calendar granularity being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

/// Options for [`bucket_for_view`].
#[derive(Debug, Clone, Default)]
pub struct BucketOptions {
    pub week_start: WeekStartDay,
}

/// Days in a bucket map, in calendar order, each holding entries in input
/// order.
pub type DayBuckets<'a> = BTreeMap<NaiveDate, Vec<&'a ProgramEntry>>;

/// Column of `weekday` in a grid that begins on `week_start`.
fn grid_column(weekday: Weekday, week_start: WeekStartDay) -> u32 {
    match week_start {
        WeekStartDay::Monday => weekday.num_days_from_monday(),
        WeekStartDay::Sunday => weekday.num_days_from_sunday(),
    }
}

// ── Day keys ────────────────────────────────────────────────────────────────

/// Parse a `YYYY-MM-DD` day key.
///
/// # Errors
///
/// Returns [`EpgError::InvalidDate`] if the string is not a valid calendar date.
pub fn parse_day_key(s: &str) -> Result<NaiveDate, EpgError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| EpgError::InvalidDate(format!("'{s}': {e}")))
}

/// The days shown by `view` around `anchor`, in calendar order.
///
/// - `Daily`: the anchor day.
/// - `Weekly`: the seven days of the week containing the anchor.
/// - `Monthly`: every day of the anchor's month.
///
/// ```
/// use chrono::NaiveDate;
/// use epg_engine::bucket::{day_keys, CalendarView, WeekStartDay};
///
/// let anchor = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
/// assert_eq!(day_keys(anchor, CalendarView::Monthly, WeekStartDay::Monday).len(), 29);
/// ```
pub fn day_keys(anchor: NaiveDate, view: CalendarView, week_start: WeekStartDay) -> Vec<NaiveDate> {
    match view {
        CalendarView::Daily => vec![anchor],
        CalendarView::Weekly => {
            let column = grid_column(anchor.weekday(), week_start);
            let start = anchor - Duration::days(i64::from(column));
            start.iter_days().take(7).collect()
        }
        CalendarView::Monthly => {
            let first = anchor.with_day(1).unwrap_or(anchor);
            first
                .iter_days()
                .take_while(|d| d.month() == anchor.month())
                .collect()
        }
    }
}

// ── Bucketing ───────────────────────────────────────────────────────────────

/// Group entries into the given days by ISO date prefix.
///
/// Every requested day is present in the result, possibly with no entries.
/// Within a day, entries keep their input order. Entries that match none of
/// the days are dropped.
///
/// ```
/// use chrono::NaiveDate;
/// use epg_engine::bucket::bucket_by_day;
/// use epg_engine::program::{EntryId, ProgramEntry, ProgramKind, ProgramStatus};
///
/// let make = |id, time: &str| ProgramEntry {
///     id: EntryId(id),
///     time: time.to_string(),
///     title: "Show".to_string(),
///     kind: ProgramKind::Recorded,
///     duration: 30,
///     geo_zone: String::new(),
///     status: ProgramStatus::Scheduled,
///     genre: String::new(),
/// };
/// let entries = [make(1, "2024-01-15T08:00"), make(2, "2024-01-16T08:00")];
/// let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
///
/// let buckets = bucket_by_day(&entries, &[day]);
/// assert_eq!(buckets[&day].len(), 1);
/// assert_eq!(buckets[&day][0].id, EntryId(1));
/// ```
pub fn bucket_by_day<'a>(entries: &'a [ProgramEntry], day_keys: &[NaiveDate]) -> DayBuckets<'a> {
    let mut buckets = DayBuckets::new();
    for day in day_keys {
        let prefix = day.format("%Y-%m-%d").to_string();
        let matching: Vec<&ProgramEntry> = entries
            .iter()
            .filter(|entry| entry.time.starts_with(&prefix))
            .collect();
        debug!(day = %prefix, count = matching.len(), "bucketed entries");
        buckets.insert(*day, matching);
    }
    buckets
}

/// Bucket entries for the days shown by `view` around `anchor`.
pub fn bucket_for_view<'a>(
    entries: &'a [ProgramEntry],
    anchor: NaiveDate,
    view: CalendarView,
    options: &BucketOptions,
) -> DayBuckets<'a> {
    let keys = day_keys(anchor, view, options.week_start);
    bucket_by_day(entries, &keys)
}

// ── Tests ───────────────────────────────────────────────────────────────────
