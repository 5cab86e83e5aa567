//! Calendar breakdown of play timestamps.

use super::EtlError;
use crate::warehouse::TimeRecord;
use chrono::{DateTime, Datelike, Timelike, Utc};

/// Decompose a millisecond epoch timestamp into its UTC calendar fields.
///
/// `week` is the ISO-8601 week number while `year` stays the calendar year,
/// so the last days of December can land in week 1.
pub fn derive_time_mark(ts: i64) -> Result<TimeRecord, EtlError> {
    let instant: DateTime<Utc> =
        DateTime::from_timestamp_millis(ts).ok_or(EtlError::InvalidTimestamp(ts))?;
    Ok(TimeRecord {
        start_time: ts,
        hour: instant.hour(),
        day: instant.day(),
        week: instant.iso_week().week(),
        month: instant.month(),
        year: instant.year(),
        weekday: instant.weekday().num_days_from_monday(),
    })
}
