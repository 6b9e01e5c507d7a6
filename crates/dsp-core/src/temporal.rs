//! # Temporal Formats — Target-Application Date Rendering
//!
//! The two date elements of a DSP document use fixed, locale-independent
//! renderings:
//!
//! - `creation_date`: `YYYY/MM/DD`, date only.
//! - `modify_time`: `MM/DD/YYYY hh:mm:ss AM|PM`, 12-hour clock, seconds
//!   precision.
//!
//! Both are local wall-clock values with no offset, which is what the target
//! application writes. chrono's `%p` always renders `AM`/`PM` regardless of
//! the process locale.

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

use crate::error::DspError;

/// `strftime` pattern of the `creation_date` element.
pub const CREATION_DATE_FORMAT: &str = "%Y/%m/%d";

/// `strftime` pattern of the `modify_time` element.
pub const MODIFY_TIME_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Current local time, truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    truncate_to_seconds(Local::now().naive_local())
}

/// Current local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Render a creation date as `YYYY/MM/DD`.
pub fn format_creation_date(date: &NaiveDate) -> String {
    date.format(CREATION_DATE_FORMAT).to_string()
}

/// Parse a `YYYY/MM/DD` creation date.
pub fn parse_creation_date(s: &str) -> Result<NaiveDate, DspError> {
    NaiveDate::parse_from_str(s.trim(), CREATION_DATE_FORMAT).map_err(|e| {
        DspError::MalformedDocument(format!("invalid creation_date {s:?}: {e}"))
    })
}

/// Render a modification time as `MM/DD/YYYY hh:mm:ss AM|PM`.
pub fn format_modify_time(time: &NaiveDateTime) -> String {
    time.format(MODIFY_TIME_FORMAT).to_string()
}

/// Parse a `MM/DD/YYYY hh:mm:ss AM|PM` modification time.
pub fn parse_modify_time(s: &str) -> Result<NaiveDateTime, DspError> {
    NaiveDateTime::parse_from_str(s.trim(), MODIFY_TIME_FORMAT)
        .map_err(|e| DspError::MalformedDocument(format!("invalid modify_time {s:?}: {e}")))
}

/// Discard sub-second precision; the wire format only carries seconds.
pub fn truncate_to_seconds(time: NaiveDateTime) -> NaiveDateTime {
    time.with_nanosecond(0).unwrap_or(time)
}
