//! iCalendar parse error types.

use std::fmt;

/// Result type for iCalendar parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// An error that occurred while tokenizing or interpreting iCalendar text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Line number where the error occurred (1-based).
    pub line: usize,
    /// Column where the error occurred (1-based).
    pub col: usize,
    /// Additional context, usually the offending text.
    pub context: Option<String>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(kind: ParseErrorKind, line: usize, col: usize) -> Self {
        Self {
            kind,
            line,
            col,
            context: None,
        }
    }

    /// Attaches context to the error.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}: {}", self.line, self.col, self.kind)?;
        if let Some(context) = &self.context {
            write!(f, " ({context})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// The kind of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Document does not start with `BEGIN:VCALENDAR`.
    MissingBegin,
    /// A component is never closed.
    MissingEnd,
    /// `END` does not match the open `BEGIN`.
    MismatchedComponent,
    /// Empty or invalid property name.
    MissingPropertyName,
    InvalidPropertyName,
    /// Property has no `:` separating the value.
    MissingColon,
    InvalidParameter,
    UnclosedQuote,
    InvalidDate,
    InvalidTime,
    InvalidDateTime,
    InvalidDuration,
    /// Malformed recurrence rule part or out-of-range by-value.
    InvalidRRule,
    /// `FREQ` missing or not a recognized frequency.
    InvalidFrequency,
    /// Weekday identifier outside `MO`..`SU`.
    InvalidWeekday,
    /// Rule key outside the recognized set.
    UnknownRulePart,
    /// Both `UNTIL` and `COUNT` present.
    UntilCountConflict,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::MissingBegin => "missing BEGIN:VCALENDAR",
            Self::MissingEnd => "missing END",
            Self::MismatchedComponent => "mismatched component",
            Self::MissingPropertyName => "missing property name",
            Self::InvalidPropertyName => "invalid property name",
            Self::MissingColon => "missing ':' before value",
            Self::InvalidParameter => "invalid parameter",
            Self::UnclosedQuote => "unclosed quote",
            Self::InvalidDate => "invalid date",
            Self::InvalidTime => "invalid time",
            Self::InvalidDateTime => "invalid date-time",
            Self::InvalidDuration => "invalid duration",
            Self::InvalidRRule => "invalid recurrence rule",
            Self::InvalidFrequency => "invalid recurrence frequency",
            Self::InvalidWeekday => "invalid weekday",
            Self::UnknownRulePart => "unknown recurrence rule part",
            Self::UntilCountConflict => "UNTIL and COUNT are mutually exclusive",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position_and_context() {
        let err = ParseError::new(ParseErrorKind::InvalidDuration, 7, 1).with_context("PXD");
        assert_eq!(err.to_string(), "line 7, column 1: invalid duration (PXD)");
    }
}
