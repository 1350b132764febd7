//! # epg-engine
//!
//! Deterministic schedule math for broadcast operations consoles.
//!
//! Everything here is a pure function or a small in-memory state holder: no
//! clock access, no I/O, no persistence. Callers supply the entries, the
//! anchor date and the campaign catalog.
//!
//! ## Modules
//!
//! - [`clock`] — `HH:MM` ↔ minutes since midnight, program display windows
//! - [`program`] — The program entry model and its two time forms
//! - [`schedule`] — Local add/edit/delete container with non-reused ids
//! - [`bucket`] — Daily/weekly/monthly calendar day keys and date-prefix bucketing
//! - [`ad`] — Ad-break duration ladder, campaign base parsing, form validation
//! - [`error`] — Error types

pub mod ad;
pub mod bucket;
pub mod clock;
pub mod error;
pub mod program;
pub mod schedule;

pub use ad::{
    campaign_base_seconds, parse_ladder_label, standard_ladder, valid_durations, AdCampaignForm,
    AdCampaignSelection, AdCatalog, AdField, Campaign, DurationOption, FieldError, FieldErrors,
    LadderConfig, LadderEntry, SaveCampaign, MAX_LADDER_ENTRIES,
};
pub use bucket::{
    bucket_by_day, bucket_for_view, day_keys, parse_day_key, BucketOptions, CalendarView,
    DayBuckets, WeekStartDay,
};
pub use clock::{minutes_to_time, time_to_minutes, window_for, wrap_to_day, ClockWindow};
pub use error::EpgError;
pub use program::{
    EntryId, EntryTime, ProgramDraft, ProgramEntry, ProgramKind, ProgramStatus, ScheduleMode,
};
pub use schedule::ProgramSchedule;
