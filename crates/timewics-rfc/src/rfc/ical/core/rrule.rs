//! Recurrence rule model (RFC 5545 §3.3.10).

use chrono::Weekday;

use super::{DateTimeForm, DateTimeValue};

/// Recurrence frequency (`FREQ`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Yearly,
    Monthly,
    Weekly,
    Daily,
    Hourly,
    Minutely,
    Secondly,
}

const FREQUENCIES: [(&str, Frequency); 7] = [
    ("YEARLY", Frequency::Yearly),
    ("MONTHLY", Frequency::Monthly),
    ("WEEKLY", Frequency::Weekly),
    ("DAILY", Frequency::Daily),
    ("HOURLY", Frequency::Hourly),
    ("MINUTELY", Frequency::Minutely),
    ("SECONDLY", Frequency::Secondly),
];

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("MO", Weekday::Mon),
    ("TU", Weekday::Tue),
    ("WE", Weekday::Wed),
    ("TH", Weekday::Thu),
    ("FR", Weekday::Fri),
    ("SA", Weekday::Sat),
    ("SU", Weekday::Sun),
];

impl Frequency {
    /// Parses a `FREQ` identifier (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        FREQUENCIES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(_, freq)| freq)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        FREQUENCIES
            .iter()
            .find(|&&(_, freq)| freq == self)
            .map_or("YEARLY", |&(name, _)| name)
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a two-letter weekday identifier (`MO` .. `SU`, case-insensitive).
#[must_use]
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    WEEKDAYS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(s))
        .map(|&(_, day)| day)
}

/// Returns the two-letter identifier for a weekday.
#[must_use]
pub fn weekday_code(day: Weekday) -> &'static str {
    WEEKDAYS
        .iter()
        .find(|&&(_, d)| d == day)
        .map_or("MO", |&(name, _)| name)
}

/// A `BYDAY` entry: a weekday with an optional signed ordinal (`2FR`, `-1SU`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekdayNum {
    pub ordinal: Option<i16>,
    pub weekday: Weekday,
}

impl std::fmt::Display for WeekdayNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ordinal) = self.ordinal {
            write!(f, "{ordinal}")?;
        }
        f.write_str(weekday_code(self.weekday))
    }
}

/// A parsed `RRULE`/`EXRULE` value.
///
/// By-field lists keep the order they were written in; an empty list means
/// the filter is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub freq: Frequency,
    pub interval: u16,
    pub until: Option<DateTimeValue>,
    pub count: Option<u32>,
    pub by_second: Vec<u8>,
    pub by_minute: Vec<u8>,
    pub by_hour: Vec<u8>,
    pub by_day: Vec<WeekdayNum>,
    pub by_monthday: Vec<i8>,
    pub by_yearday: Vec<i16>,
    pub by_weekno: Vec<i8>,
    pub by_month: Vec<u8>,
    pub by_setpos: Vec<i32>,
    pub wkst: Weekday,
}

impl RecurrenceRule {
    /// Creates a rule with the given frequency and every other field at its
    /// default (`INTERVAL=1`, `WKST=MO`, no bound, no filters).
    #[must_use]
    pub fn new(freq: Frequency) -> Self {
        Self {
            freq,
            interval: 1,
            until: None,
            count: None,
            by_second: Vec::new(),
            by_minute: Vec::new(),
            by_hour: Vec::new(),
            by_day: Vec::new(),
            by_monthday: Vec::new(),
            by_yearday: Vec::new(),
            by_weekno: Vec::new(),
            by_month: Vec::new(),
            by_setpos: Vec::new(),
            wkst: Weekday::Mon,
        }
    }

    /// A rule is bounded when it carries `UNTIL` or `COUNT`.
    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        self.until.is_some() || self.count.is_some()
    }

    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        !self.is_bounded()
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl std::fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FREQ={}", self.freq)?;
        if self.interval != 1 {
            write!(f, ";INTERVAL={}", self.interval)?;
        }
        if let Some(until) = &self.until {
            let text = match until.form {
                DateTimeForm::Date => until.value.format("%Y%m%d").to_string(),
                DateTimeForm::Floating => until.value.format("%Y%m%dT%H%M%S").to_string(),
                DateTimeForm::Utc => until.value.format("%Y%m%dT%H%M%SZ").to_string(),
            };
            write!(f, ";UNTIL={text}")?;
        }
        if let Some(count) = self.count {
            write!(f, ";COUNT={count}")?;
        }
        let lists = [
            ("BYSECOND", join(&self.by_second)),
            ("BYMINUTE", join(&self.by_minute)),
            ("BYHOUR", join(&self.by_hour)),
            ("BYDAY", join(&self.by_day)),
            ("BYMONTHDAY", join(&self.by_monthday)),
            ("BYYEARDAY", join(&self.by_yearday)),
            ("BYWEEKNO", join(&self.by_weekno)),
            ("BYMONTH", join(&self.by_month)),
            ("BYSETPOS", join(&self.by_setpos)),
        ];
        for (key, value) in lists {
            if !value.is_empty() {
                write!(f, ";{key}={value}")?;
            }
        }
        if self.wkst != Weekday::Mon {
            write!(f, ";WKST={}", weekday_code(self.wkst))?;
        }
        Ok(())
    }
}
