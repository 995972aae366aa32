//! iCalendar parsing (RFC 5545).
//!
//! Parsing happens in two steps: the lexer turns text into untyped content
//! lines grouped into a component tree, and the value parsers interpret
//! individual fields on demand.
//!
//! ## Usage
//!
//! ```rust
//! use timewics_rfc::rfc::ical::parse;
//!
//! let input = "\
//! BEGIN:VCALENDAR\r\n\
//! X-WR-CALNAME:Work\r\n\
//! BEGIN:VEVENT\r\n\
//! SUMMARY:Standup\r\n\
//! DURATION:PT30M\r\n\
//! END:VEVENT\r\n\
//! END:VCALENDAR\r\n";
//!
//! let calendar = parse::parse(input).unwrap();
//! assert_eq!(calendar.events().len(), 1);
//!
//! let duration = parse::parse_duration("PT30M", 1, 1).unwrap();
//! assert_eq!(duration.to_time_delta().num_minutes(), 30);
//! ```

mod error;
mod lexer;
mod parser;
mod values;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use lexer::{parse_content_line, split_lines};
pub use parser::parse;
pub use values::{
    parse_date, parse_datetime, parse_duration, parse_rrule, parse_time, strip_qualifier,
};
