//! Clock arithmetic for bare `HH:MM` schedule times.
//!
//! Times are minutes since midnight. The hour field is not bounded to 0-23 in
//! either direction: `"25:00"` parses to 1500, and 1500 formats back to
//! `"25:00"`. Programs that run past midnight therefore end on an hour of 24 or
//! more rather than wrapping to the next day. [`ClockWindow::crosses_midnight`]
//! reports when that happens, and [`wrap_to_day`] folds a value back into a
//! single day when a caller explicitly wants that.
//!
//! # Functions
//!
//! - [`time_to_minutes`] — `"HH:MM"` → minutes since midnight
//! - [`minutes_to_time`] — minutes since midnight → `"HH:MM"`
//! - [`window_for`] — start time + duration → display window

use serde::Serialize;

use crate::error::EpgError;

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

// ── time_to_minutes ─────────────────────────────────────────────────────────

/// Parse a `"HH:MM"` clock string into minutes since midnight.
///
/// The hour may have one or more digits and is not capped at 23. The minute
/// field must be below 60.
///
/// # Errors
///
/// Returns [`EpgError::InvalidClock`] when the string does not have exactly two
/// colon-separated numeric fields, when the minute field is 60 or more, or when
/// the result does not fit in a `u32`.
///
/// # Examples
///
/// ```
/// use epg_engine::clock::time_to_minutes;
///
/// assert_eq!(time_to_minutes("09:30").unwrap(), 570);
/// assert_eq!(time_to_minutes("25:00").unwrap(), 1500);
/// ```
pub fn time_to_minutes(clock: &str) -> Result<u32, EpgError> {
    let trimmed = clock.trim();
    let (hours, minutes) = trimmed
        .split_once(':')
        .ok_or_else(|| EpgError::InvalidClock(format!("'{clock}': expected HH:MM")))?;

    let hours = parse_field(hours, clock)?;
    let minutes = parse_field(minutes, clock)?;

    if minutes >= 60 {
        return Err(EpgError::InvalidClock(format!(
            "'{clock}': minutes must be below 60"
        )));
    }

    hours
        .checked_mul(60)
        .and_then(|h| h.checked_add(minutes))
        .ok_or_else(|| EpgError::InvalidClock(format!("'{clock}': out of range")))
}

// ── minutes_to_time ─────────────────────────────────────────────────────────

/// Format minutes since midnight as `"HH:MM"`.
///
/// Hours are not wrapped at 24: `minutes_to_time(1500)` is `"25:00"`.
///
/// ```
/// use epg_engine::clock::minutes_to_time;
///
/// assert_eq!(minutes_to_time(570), "09:30");
/// assert_eq!(minutes_to_time(1500), "25:00");
/// ```
pub fn minutes_to_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Fold a minute offset into `0..MINUTES_PER_DAY`.
///
/// Never applied implicitly by this module.
pub fn wrap_to_day(minutes: u32) -> u32 {
    minutes % MINUTES_PER_DAY
}

// ── window_for ──────────────────────────────────────────────────────────────

/// The display window of a program that starts at a clock time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockWindow {
    /// Start as `"HH:MM"`.
    pub start: String,
    /// End as `"HH:MM"`. The hour may be 24 or more.
    pub end: String,
    pub start_minutes: u32,
    pub end_minutes: u32,
    /// Whether the end falls on or after the next midnight.
    pub crosses_midnight: bool,
}

/// Compute the `(start, end)` window for a program.
///
/// `end = start + duration_minutes`, formatted with [`minutes_to_time`]. The
/// start is echoed back in normalized two-digit form.
///
/// # Errors
///
/// Returns [`EpgError::InvalidClock`] if `start` cannot be parsed or the end
/// overflows.
///
/// # Examples
///
/// ```
/// use epg_engine::clock::window_for;
///
/// let window = window_for("08:00", 90).unwrap();
/// assert_eq!((window.start.as_str(), window.end.as_str()), ("08:00", "09:30"));
/// ```
pub fn window_for(start: &str, duration_minutes: u32) -> Result<ClockWindow, EpgError> {
    let start_minutes = time_to_minutes(start)?;
    let end_minutes = start_minutes.checked_add(duration_minutes).ok_or_else(|| {
        EpgError::InvalidClock(format!(
            "'{start}' + {duration_minutes} minutes is out of range"
        ))
    })?;

    Ok(ClockWindow {
        start: minutes_to_time(start_minutes),
        end: minutes_to_time(end_minutes),
        start_minutes,
        end_minutes,
        crosses_midnight: end_minutes >= MINUTES_PER_DAY,
    })
}

// ── Internal helpers ────────────────────────────────────────────────────────

fn parse_field(field: &str, clock: &str) -> Result<u32, EpgError> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EpgError::InvalidClock(format!(
            "'{clock}': expected numeric hour and minute fields"
        )));
    }
    field
        .parse()
        .map_err(|_| EpgError::InvalidClock(format!("'{clock}': out of range")))
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_to_minutes_basic() {
        assert_eq!(time_to_minutes("09:30").unwrap(), 570);
        assert_eq!(time_to_minutes("00:00").unwrap(), 0);
        assert_eq!(time_to_minutes("23:59").unwrap(), 1439);
    }

    #[test]
    fn test_time_to_minutes_single_digit_hour() {
        assert_eq!(time_to_minutes("9:05").unwrap(), 545);
    }

    #[test]
    fn test_time_to_minutes_hour_not_bounded() {
        assert_eq!(time_to_minutes("25:00").unwrap(), 1500);
        assert_eq!(time_to_minutes("100:15").unwrap(), 6015);
    }

    #[test]
    fn test_time_to_minutes_trims_whitespace() {
        assert_eq!(time_to_minutes(" 08:00 ").unwrap(), 480);
    }

    #[test]
    fn test_time_to_minutes_rejects_malformed() {
        for bad in ["", "0930", "09:", ":30", "aa:bb", "09:30:00", "-1:00", "09:3x"] {
            let err = time_to_minutes(bad).unwrap_err();
            assert!(
                matches!(err, EpgError::InvalidClock(_)),
                "expected InvalidClock for {bad:?}"
            );
        }
    }

    #[test]
    fn test_time_to_minutes_rejects_minutes_over_59() {
        assert!(time_to_minutes("08:60").is_err());
    }

    #[test]
    fn test_time_to_minutes_rejects_overflow() {
        assert!(time_to_minutes("99999999999:00").is_err());
        assert!(time_to_minutes("4294967295:00").is_err());
    }

    #[test]
    fn test_minutes_to_time_basic() {
        assert_eq!(minutes_to_time(570), "09:30");
        assert_eq!(minutes_to_time(0), "00:00");
        assert_eq!(minutes_to_time(1439), "23:59");
    }

    #[test]
    fn test_minutes_to_time_does_not_wrap() {
        assert_eq!(minutes_to_time(1440), "24:00");
        assert_eq!(minutes_to_time(1500), "25:00");
    }

    #[test]
    fn test_wrap_to_day() {
        assert_eq!(wrap_to_day(1500), 60);
        assert_eq!(wrap_to_day(1439), 1439);
        assert_eq!(wrap_to_day(2880), 0);
    }

    #[test]
    fn test_window_for_basic() {
        let window = window_for("08:00", 90).unwrap();
        assert_eq!(window.start, "08:00");
        assert_eq!(window.end, "09:30");
        assert_eq!(window.start_minutes, 480);
        assert_eq!(window.end_minutes, 570);
        assert!(!window.crosses_midnight);
    }

    #[test]
    fn test_window_for_zero_duration_placeholder() {
        let window = window_for("14:00", 0).unwrap();
        assert_eq!(window.start, window.end);
    }

    #[test]
    fn test_window_for_normalizes_start() {
        let window = window_for("8:00", 30).unwrap();
        assert_eq!(window.start, "08:00");
        assert_eq!(window.end, "08:30");
    }

    #[test]
    fn test_window_for_crosses_midnight() {
        let window = window_for("23:30", 60).unwrap();
        assert_eq!(window.end, "24:30");
        assert!(window.crosses_midnight);
    }

    #[test]
    fn test_window_for_ending_exactly_at_midnight() {
        let window = window_for("23:00", 60).unwrap();
        assert_eq!(window.end, "24:00");
        assert!(window.crosses_midnight);
    }

    #[test]
    fn test_window_for_invalid_start() {
        assert!(window_for("noon", 30).is_err());
    }

    #[test]
    fn test_window_for_overflow() {
        assert!(window_for("10:00", u32::MAX).is_err());
    }
}
