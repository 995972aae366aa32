//! Expansion of parsed iCalendar values: timezone resolution, wall-clock
//! normalization and recurrence enumeration.

mod normalize;
mod recurrence;
mod timezone;

pub use normalize::{
    UTC_FORMAT, format_utc, rezone, standardize, to_utc, to_utc_string, wall_clock,
};
pub use recurrence::CompiledRule;
pub use timezone::{ConversionError, TimeZoneResolver, localize};
