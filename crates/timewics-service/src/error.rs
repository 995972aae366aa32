use thiserror::Error;
use timewics_rfc::error::RfcError;
use timewics_rfc::rfc::ical::expand::ConversionError;
use timewics_rfc::rfc::ical::parse::ParseError;

/// Event and calendar model errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    RfcError(#[from] RfcError),

    #[error("Missing required property: {0}")]
    MissingProperty(&'static str),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Event \"{summary}\" repeats forever")]
    UnboundedRecurrence { summary: String },
}

impl From<ParseError> for ServiceError {
    fn from(err: ParseError) -> Self {
        Self::RfcError(err.into())
    }
}

impl From<ConversionError> for ServiceError {
    fn from(err: ConversionError) -> Self {
        Self::RfcError(err.into())
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
