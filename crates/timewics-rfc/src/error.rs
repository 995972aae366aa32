use thiserror::Error;

use crate::rfc::ical::expand::ConversionError;
use crate::rfc::ical::parse::ParseError;

/// iCalendar parsing and expansion errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Timezone conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("RRule validation error: {0}")]
    RuleValidation(String),

    #[error("Recurrence rule has neither UNTIL nor COUNT: {0}")]
    UnboundedRecurrence(String),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
