//! Datetime normalization between raw tokens, zoned wall clock and UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

use super::timezone::{ConversionError, localize};
use crate::error::RfcResult;
use crate::rfc::ical::core::DateTimeValue;
use crate::rfc::ical::parse::{parse_datetime, strip_qualifier};

/// Format used for every UTC timestamp this crate emits.
pub const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// ## Summary
/// Converts a raw date-time token into wall-clock time in `zone`.
///
/// A leading `TZID=...:` or `VALUE=DATE:` qualifier is dropped. `Z`-suffixed
/// payloads are converted from UTC into `zone`; everything else already is
/// wall-clock time. Date-only payloads become midnight.
///
/// ## Errors
/// Returns a parse error if the payload is not a DATE or DATE-TIME; `line`
/// is reported as its position.
pub fn standardize(
    token: Option<&str>,
    zone: Tz,
    line: usize,
) -> RfcResult<Option<NaiveDateTime>> {
    let Some(token) = token else {
        return Ok(None);
    };

    let value = parse_datetime(strip_qualifier(token), line, 1)?;
    Ok(Some(wall_clock(value, zone)))
}

/// ## Summary
/// Returns the wall-clock time of a parsed value in `zone`.
///
/// Only UTC values are converted; floating and date values are taken as-is.
#[must_use]
pub fn wall_clock(value: DateTimeValue, zone: Tz) -> NaiveDateTime {
    if value.is_utc() {
        value.value.and_utc().with_timezone(&zone).naive_local()
    } else {
        value.value
    }
}

/// ## Summary
/// Moves a wall-clock time from one zone into another.
///
/// ## Errors
/// Returns an error if `local` cannot be resolved in `from`.
pub fn rezone(local: NaiveDateTime, from: Tz, to: Tz) -> Result<NaiveDateTime, ConversionError> {
    if from == to {
        return Ok(local);
    }
    Ok(localize(local, from)?.with_timezone(&to).naive_local())
}

/// ## Summary
/// Resolves a wall-clock time in `zone` to a UTC instant.
///
/// ## Errors
/// Returns an error if `local` falls into an unresolvable DST gap.
pub fn to_utc(local: NaiveDateTime, zone: Tz) -> Result<DateTime<Utc>, ConversionError> {
    Ok(localize(local, zone)?.with_timezone(&Utc))
}

/// ## Summary
/// Renders a wall-clock time in `zone` as `YYYYMMDDTHHMMSSZ`.
///
/// ## Errors
/// Returns an error if `local` falls into an unresolvable DST gap.
pub fn to_utc_string(
    local: Option<NaiveDateTime>,
    zone: Tz,
) -> Result<Option<String>, ConversionError> {
    local
        .map(|local| to_utc(local, zone).map(format_utc))
        .transpose()
}

/// Renders a UTC instant as `YYYYMMDDTHHMMSSZ`.
#[must_use]
pub fn format_utc(instant: DateTime<Utc>) -> String {
    instant.format(UTC_FORMAT).to_string()
}
