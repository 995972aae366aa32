//! iCalendar DATE and DATE-TIME values (RFC 5545 §3.3.4, §3.3.5).

use chrono::NaiveDateTime;

/// How a date-time value was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateTimeForm {
    /// `YYYYMMDD`; the value holds midnight of that date.
    Date,
    /// `YYYYMMDDTHHMMSS`: wall-clock time in whatever zone applies.
    Floating,
    /// `YYYYMMDDTHHMMSSZ`: an absolute instant in UTC.
    Utc,
}

/// A parsed date-time token, before any timezone is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateTimeValue {
    pub value: NaiveDateTime,
    pub form: DateTimeForm,
}

impl DateTimeValue {
    #[must_use]
    pub const fn is_utc(&self) -> bool {
        matches!(self.form, DateTimeForm::Utc)
    }

    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self.form, DateTimeForm::Date)
    }
}
