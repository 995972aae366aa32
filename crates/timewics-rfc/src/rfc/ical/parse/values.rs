//! Value type parsers for iCalendar (RFC 5545 §3.3).
#![expect(
    clippy::map_err_ignore,
    reason = "Value parsers report position and offending text instead of the source error"
)]

use std::ops::RangeInclusive;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::ical::core::{
    DateTimeForm, DateTimeValue, Duration, Frequency, RecurrenceRule, WeekdayNum, parse_weekday,
};

/// Returns the payload of a possibly qualified token.
///
/// `TZID=Europe/Paris:20240101T090000` and `VALUE=DATE:20240101` carry their
/// parameters in front of the last `:`; bare tokens are returned unchanged.
#[must_use]
pub fn strip_qualifier(token: &str) -> &str {
    token.rsplit_once(':').map_or(token, |(_, payload)| payload)
}

fn digits(s: &str, range: std::ops::Range<usize>) -> Option<u32> {
    let part = s.get(range)?;
    if part.bytes().all(|b| b.is_ascii_digit()) {
        part.parse().ok()
    } else {
        None
    }
}

/// Parses a DATE value (RFC 5545 §3.3.4).
///
/// Format: YYYYMMDD (e.g., "19970714")
///
/// ## Errors
/// Returns an error if the string is not a valid 8-digit calendar date.
pub fn parse_date(s: &str, line: usize, col: usize) -> ParseResult<NaiveDate> {
    let invalid = || ParseError::new(ParseErrorKind::InvalidDate, line, col).with_context(s);

    if s.len() != 8 {
        return Err(invalid());
    }

    let year = digits(s, 0..4).ok_or_else(invalid)?;
    let month = digits(s, 4..6).ok_or_else(invalid)?;
    let day = digits(s, 6..8).ok_or_else(invalid)?;

    let year = i32::try_from(year).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Parses a TIME value without zone suffix (RFC 5545 §3.3.12).
///
/// Format: HHMMSS (e.g., "133000")
///
/// ## Errors
/// Returns an error if the string is not a valid 6-digit time of day.
pub fn parse_time(s: &str, line: usize, col: usize) -> ParseResult<NaiveTime> {
    let invalid = || ParseError::new(ParseErrorKind::InvalidTime, line, col).with_context(s);

    if s.len() != 6 {
        return Err(invalid());
    }

    let hour = digits(s, 0..2).ok_or_else(invalid)?;
    let minute = digits(s, 2..4).ok_or_else(invalid)?;
    let second = digits(s, 4..6).ok_or_else(invalid)?;

    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(invalid)
}

/// Parses a DATE or DATE-TIME token (RFC 5545 §3.3.4, §3.3.5).
///
/// - `YYYYMMDD` yields midnight of that date (`DateTimeForm::Date`)
/// - `YYYYMMDDTHHMMSS` is floating wall-clock time
/// - `YYYYMMDDTHHMMSSZ` is an instant in UTC
///
/// ## Errors
/// Returns an error if the token matches none of the three forms.
pub fn parse_datetime(s: &str, line: usize, col: usize) -> ParseResult<DateTimeValue> {
    let s = s.trim();

    if s.len() == 8 {
        let date = parse_date(s, line, col)?;
        return Ok(DateTimeValue {
            value: date.and_time(NaiveTime::MIN),
            form: DateTimeForm::Date,
        });
    }

    let (body, form) = match s.strip_suffix(['Z', 'z']) {
        Some(body) => (body, DateTimeForm::Utc),
        None => (s, DateTimeForm::Floating),
    };

    let Some((date_str, time_str)) = body.split_once(['T', 't']) else {
        return Err(ParseError::new(ParseErrorKind::InvalidDateTime, line, col).with_context(s));
    };

    let date = parse_date(date_str, line, col)?;
    let time = parse_time(time_str, line, col + date_str.len() + 1)?;

    Ok(DateTimeValue {
        value: NaiveDateTime::new(date, time),
        form,
    })
}

/// Parses a DURATION value (RFC 5545 §3.3.6).
///
/// Format: `[+|-]P[nW][nD][T[nH][nM][nS]]`. Every field is optional but at
/// least one must be present; weeks and days may be combined. Units must
/// appear in the order above.
///
/// ## Errors
/// Returns an error if the `P` designator is missing, a number has no unit,
/// a unit is out of place or repeated, a value overflows, or nothing follows
/// `P` or `T`.
pub fn parse_duration(s: &str, line: usize, col: usize) -> ParseResult<Duration> {
    let invalid = || ParseError::new(ParseErrorKind::InvalidDuration, line, col).with_context(s);

    let (negative, unsigned) = if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else {
        (false, s.strip_prefix('+').unwrap_or(s))
    };

    let body = unsigned.strip_prefix(['P', 'p']).ok_or_else(invalid)?;
    let upper = body.to_ascii_uppercase();
    let (date_part, time_part) = match upper.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (upper.as_str(), None),
    };

    if time_part.is_some_and(str::is_empty) || (date_part.is_empty() && time_part.is_none()) {
        return Err(invalid());
    }

    let mut date_fields = [0_u32; 2];
    let mut time_fields = [0_u32; 3];
    if !read_fields(date_part, &['W', 'D'], &mut date_fields)
        || !read_fields(time_part.unwrap_or(""), &['H', 'M', 'S'], &mut time_fields)
    {
        return Err(invalid());
    }

    let [weeks, days] = date_fields;
    let [hours, minutes, seconds] = time_fields;
    Ok(Duration {
        negative,
        weeks,
        days,
        hours,
        minutes,
        seconds,
    })
}

/// Reads `<digits><unit>` pairs where each unit is one of `units`, in order
/// and at most once. Returns `false` on any malformed input.
fn read_fields(part: &str, units: &[char], out: &mut [u32]) -> bool {
    let mut next_unit = 0;
    let mut number_start = 0;

    for (i, c) in part.char_indices() {
        if c.is_ascii_digit() {
            continue;
        }
        let Some(offset) = units[next_unit..].iter().position(|&u| u == c) else {
            return false;
        };
        let Ok(value) = part[number_start..i].parse::<u32>() else {
            return false;
        };
        let slot = next_unit + offset;
        out[slot] = value;
        next_unit = slot + 1;
        number_start = i + c.len_utf8();
    }

    number_start == part.len()
}

/// Parses a RECUR (RRULE/EXRULE) value (RFC 5545 §3.3.10).
///
/// Keys are case-insensitive and may appear in any order. `FREQ` is
/// required; `INTERVAL` defaults to 1 and `WKST` to Monday.
///
/// ## Errors
/// Returns an error for a missing or unknown `FREQ`, an unknown or repeated
/// key, a part without `=`, `UNTIL` together with `COUNT`, `INTERVAL=0`, an
/// unknown weekday, or a by-value outside its allowed range.
pub fn parse_rrule(s: &str, line: usize, col: usize) -> ParseResult<RecurrenceRule> {
    let mut freq = None;
    let mut rule = RecurrenceRule::new(Frequency::Yearly);
    let mut seen: Vec<String> = Vec::new();

    for part in s.trim().split(';').filter(|p| !p.is_empty()) {
        let (key, value) = part.split_once('=').ok_or_else(|| {
            ParseError::new(ParseErrorKind::InvalidRRule, line, col).with_context(part)
        })?;

        let key = key.trim().to_ascii_uppercase();
        if seen.contains(&key) {
            return Err(ParseError::new(ParseErrorKind::InvalidRRule, line, col)
                .with_context(format!("duplicate {key}")));
        }

        if key == "FREQ" {
            freq = Some(Frequency::parse(value.trim()).ok_or_else(|| {
                ParseError::new(ParseErrorKind::InvalidFrequency, line, col).with_context(value)
            })?);
        } else {
            parse_rrule_part(&mut rule, &key, value.trim(), line, col)?;
        }
        seen.push(key);
    }

    rule.freq = freq.ok_or_else(|| {
        ParseError::new(ParseErrorKind::InvalidFrequency, line, col).with_context("missing FREQ")
    })?;

    if rule.until.is_some() && rule.count.is_some() {
        return Err(ParseError::new(ParseErrorKind::UntilCountConflict, line, col).with_context(s));
    }

    check_frequency_scope(&rule, line, col)?;

    tracing::trace!(rule = %rule, "Parsed recurrence rule");
    Ok(rule)
}

/// Parses a single RRULE key-value pair other than `FREQ`.
fn parse_rrule_part(
    rule: &mut RecurrenceRule,
    key: &str,
    value: &str,
    line: usize,
    col: usize,
) -> ParseResult<()> {
    let invalid = || {
        ParseError::new(ParseErrorKind::InvalidRRule, line, col).with_context(format!("{key}={value}"))
    };

    match key {
        "INTERVAL" => {
            rule.interval = value.parse().map_err(|_| invalid())?;
            if rule.interval == 0 {
                return Err(invalid());
            }
        }
        "COUNT" => rule.count = Some(value.parse().map_err(|_| invalid())?),
        "UNTIL" => rule.until = Some(parse_datetime(value, line, col)?),
        "WKST" => {
            rule.wkst = parse_weekday(value).ok_or_else(|| {
                ParseError::new(ParseErrorKind::InvalidWeekday, line, col).with_context(value)
            })?;
        }
        "BYSECOND" => rule.by_second = parse_list(value, 0..=59, false).ok_or_else(invalid)?,
        "BYMINUTE" => rule.by_minute = parse_list(value, 0..=59, false).ok_or_else(invalid)?,
        "BYHOUR" => rule.by_hour = parse_list(value, 0..=23, false).ok_or_else(invalid)?,
        "BYDAY" => rule.by_day = parse_byday(value, line, col)?,
        "BYMONTHDAY" => {
            rule.by_monthday = parse_list(value, -31..=31, true).ok_or_else(invalid)?;
        }
        "BYYEARDAY" => {
            rule.by_yearday = parse_list(value, -366..=366, true).ok_or_else(invalid)?;
        }
        "BYWEEKNO" => rule.by_weekno = parse_list(value, -53..=53, true).ok_or_else(invalid)?,
        "BYMONTH" => rule.by_month = parse_list(value, 1..=12, false).ok_or_else(invalid)?,
        "BYSETPOS" => rule.by_setpos = parse_list(value, -366..=366, true).ok_or_else(invalid)?,
        _ => {
            return Err(
                ParseError::new(ParseErrorKind::UnknownRulePart, line, col).with_context(key),
            );
        }
    }
    Ok(())
}

/// Rejects by-rules that RFC 5545 §3.3.10 does not allow with the rule's
/// frequency.
fn check_frequency_scope(rule: &RecurrenceRule, line: usize, col: usize) -> ParseResult<()> {
    let freq = rule.freq;
    let monthly_or_yearly = matches!(freq, Frequency::Monthly | Frequency::Yearly);

    let conflict = if !monthly_or_yearly && rule.by_day.iter().any(|d| d.ordinal.is_some()) {
        Some("BYDAY with an ordinal")
    } else if !rule.by_weekno.is_empty() && !matches!(freq, Frequency::Yearly) {
        Some("BYWEEKNO")
    } else if !rule.by_yearday.is_empty()
        && matches!(freq, Frequency::Daily | Frequency::Weekly | Frequency::Monthly)
    {
        Some("BYYEARDAY")
    } else if !rule.by_monthday.is_empty() && matches!(freq, Frequency::Weekly) {
        Some("BYMONTHDAY")
    } else {
        None
    };

    match conflict {
        Some(part) => Err(ParseError::new(ParseErrorKind::InvalidRRule, line, col)
            .with_context(format!("{part} is not allowed with FREQ={}", freq.as_str()))),
        None => Ok(()),
    }
}

/// Parses a comma-separated list of integers within `range`.
///
/// Signed by-values (`nonzero`) additionally reject `0`.
fn parse_list<T: TryFrom<i32>>(s: &str, range: RangeInclusive<i32>, nonzero: bool) -> Option<Vec<T>> {
    s.split(',')
        .map(|v| {
            let n: i32 = v.trim().parse().ok()?;
            if !range.contains(&n) || (nonzero && n == 0) {
                return None;
            }
            T::try_from(n).ok()
        })
        .collect()
}

/// Parses a BYDAY value (weekdays with optional ordinals).
fn parse_byday(s: &str, line: usize, col: usize) -> ParseResult<Vec<WeekdayNum>> {
    s.split(',')
        .map(|v| parse_weekday_num(v.trim(), line, col))
        .collect()
}

/// Parses a single weekday with optional ordinal (e.g., "MO", "1MO", "-1FR").
fn parse_weekday_num(s: &str, line: usize, col: usize) -> ParseResult<WeekdayNum> {
    let invalid_weekday =
        || ParseError::new(ParseErrorKind::InvalidWeekday, line, col).with_context(s);

    let split = s.len().checked_sub(2).ok_or_else(invalid_weekday)?;
    let (ordinal_str, weekday_str) = (s.get(..split), s.get(split..));
    let weekday = weekday_str
        .and_then(parse_weekday)
        .ok_or_else(invalid_weekday)?;

    let ordinal = match ordinal_str {
        None | Some("") => None,
        Some(text) => {
            let n: i16 = text.parse().map_err(|_| {
                ParseError::new(ParseErrorKind::InvalidRRule, line, col).with_context(s)
            })?;
            if n == 0 || !(-53..=53).contains(&n) {
                return Err(ParseError::new(ParseErrorKind::InvalidRRule, line, col).with_context(s));
            }
            Some(n)
        }
    };

    Ok(WeekdayNum { ordinal, weekday })
}
