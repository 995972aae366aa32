//! iCalendar core models (RFC 5545).
//!
//! Content lines stay untyped (`ContentLine`) until a consumer asks for a
//! specific field; the typed values below are produced by `parse::values`.

mod component;
mod datetime;
mod duration;
mod parameter;
mod property;
mod rrule;

pub use component::{Component, ComponentKind};
pub use datetime::{DateTimeForm, DateTimeValue};
pub use duration::Duration;
pub use parameter::Parameter;
pub use property::ContentLine;
pub use rrule::{Frequency, RecurrenceRule, WeekdayNum, parse_weekday, weekday_code};
