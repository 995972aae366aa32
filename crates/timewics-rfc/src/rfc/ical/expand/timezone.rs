//! Zone lookup for `TZID` and `X-WR-TIMEZONE` values, and placement of wall
//! clock times on the timeline.
//!
//! Identifiers are canonicalized through ICU4X, which knows Windows zone
//! names and retired IANA aliases.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;

/// Prefixes some producers put in front of IANA names.
const VENDOR_PREFIXES: [&str; 2] = ["/mozilla.org/", "/softwarestudio.org/"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Wall clock time inside a DST gap that shifting could not fix.
    #[error("Non-existent time (DST gap): {0}")]
    NonExistentTime(String),
}

/// Maps zone identifiers to `chrono_tz` zones, remembering each spelling it
/// was asked for.
///
/// One resolver is meant to live for a single calendar parse.
#[derive(Debug, Default)]
pub struct TimeZoneResolver {
    known: HashMap<String, Tz>,
}

impl TimeZoneResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Looks up `tzid`, canonicalizing it first.
    ///
    /// ## Errors
    /// Returns `ConversionError::UnknownTimezone` when neither the canonical
    /// nor the literal spelling names a zone.
    pub fn resolve(&mut self, tzid: &str) -> Result<Tz, ConversionError> {
        if let Some(zone) = self.known.get(tzid) {
            return Ok(*zone);
        }

        let literal = tzid.trim();
        let canonical = canonical_tzid(literal);
        let zone = Tz::from_str(&canonical)
            .or_else(|_e| Tz::from_str(literal))
            .map_err(|_e| ConversionError::UnknownTimezone(tzid.to_string()))?;

        tracing::trace!(tzid, %canonical, zone = zone.name(), "Resolved timezone");
        self.known.insert(tzid.to_string(), zone);
        Ok(zone)
    }
}

/// Returns the canonical IANA name for `tzid`.
///
/// Identifiers ICU does not recognize come back with any vendor prefix
/// removed.
fn canonical_tzid(tzid: &str) -> String {
    let bare = VENDOR_PREFIXES
        .iter()
        .find_map(|prefix| tzid.strip_prefix(prefix))
        .unwrap_or(tzid);

    let iana = IanaParserExtended::new();

    let windows = WindowsParser::new()
        .parse(bare, None)
        .and_then(|zone| iana.iter().find(|entry| entry.time_zone == zone));
    if let Some(entry) = windows {
        return entry.canonical.to_string();
    }

    let parsed = iana.parse(bare);
    if parsed.time_zone == icu::time::TimeZone::UNKNOWN {
        bare.to_string()
    } else {
        parsed.canonical.to_string()
    }
}

/// ## Summary
/// Places a wall clock time of `zone` on the timeline.
///
/// In a DST fold the first of the two instants is used. In a DST gap the
/// time is moved one hour later.
///
/// ## Errors
/// Returns `ConversionError::NonExistentTime` if the moved time is still in
/// a gap.
pub fn localize(local: NaiveDateTime, zone: Tz) -> Result<DateTime<Tz>, ConversionError> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(instant) | LocalResult::Ambiguous(instant, _) => Ok(instant),
        LocalResult::None => {
            let shifted = local + TimeDelta::hours(1);
            tracing::debug!(%local, %shifted, zone = zone.name(), "Local time falls in a DST gap");
            zone.from_local_datetime(&shifted).earliest().ok_or_else(|| {
                ConversionError::NonExistentTime(format!("{local} in {}", zone.name()))
            })
        }
    }
}
