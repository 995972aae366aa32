//! iCalendar (RFC 5545) support: tokenizing, value parsing, and recurrence
//! expansion for `VEVENT` blocks.

pub mod core;
pub mod expand;
pub mod parse;
