//! Content line lexer for iCalendar (RFC 5545 §3.1).
//!
//! Handles line unfolding and tokenization of content lines.

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::ical::core::{ContentLine, Parameter};

/// Splits input into content lines, merging folded continuations.
///
/// Handles both CRLF and bare LF line endings. Lines starting with SP/HTAB
/// continue the previous line; the leading whitespace character is dropped
/// and nothing is inserted (RFC 5545 §3.1). Lines without any `:` are also
/// treated as continuations, which keeps hand-edited exports readable.
///
/// Each entry carries the 1-based number of the physical line it starts on.
#[must_use]
pub fn split_lines(input: &str) -> Vec<(usize, String)> {
    let mut lines: Vec<(usize, String)> = Vec::new();

    for (i, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        let continuation = if let Some(rest) = line.strip_prefix([' ', '\t']) {
            Some(rest)
        } else if line.contains(':') {
            None
        } else {
            Some(line)
        };

        match (continuation, lines.last_mut()) {
            (Some(rest), Some((_, prev))) => prev.push_str(rest),
            (Some(rest), None) => lines.push((i + 1, rest.to_string())),
            (None, _) => lines.push((i + 1, line.to_string())),
        }
    }

    lines
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Parses a single content line.
///
/// Format: `name *(";" param) ":" value`
///
/// ## Errors
/// Returns an error if the name is empty or contains invalid characters, a
/// parameter is malformed, a quoted parameter value is never closed, or no
/// `:` introduces the value.
pub fn parse_content_line(line: &str, line_num: usize) -> ParseResult<ContentLine> {
    let Some(name_end) = line.find([';', ':']) else {
        return Err(
            ParseError::new(ParseErrorKind::MissingColon, line_num, line.len())
                .with_context(line),
        );
    };

    if name_end == 0 {
        return Err(ParseError::new(
            ParseErrorKind::MissingPropertyName,
            line_num,
            1,
        ));
    }

    let name = &line[..name_end];
    if let Some(bad) = name.find(|c: char| !is_name_char(c)) {
        return Err(
            ParseError::new(ParseErrorKind::InvalidPropertyName, line_num, bad + 1)
                .with_context(name),
        );
    }

    let mut params = Vec::new();
    let mut pos = name_end;
    while line[pos..].starts_with(';') {
        let (param, next) = parse_parameter(line, pos + 1, line_num)?;
        params.push(param);
        pos = next;
    }

    // `pos` now sits on the ':' that introduces the value
    Ok(ContentLine::with_params(name, params, &line[pos + 1..]))
}

/// Parses one `NAME=value[,value...]` parameter starting at byte `start`.
///
/// Returns the parameter and the byte index of the `;` or `:` that ends it.
fn parse_parameter(line: &str, start: usize, line_num: usize) -> ParseResult<(Parameter, usize)> {
    let rest = &line[start..];
    let Some(eq) = rest.find(|c: char| !is_name_char(c)) else {
        return Err(ParseError::new(
            ParseErrorKind::MissingColon,
            line_num,
            line.len(),
        ));
    };

    if eq == 0 || !rest[eq..].starts_with('=') {
        return Err(
            ParseError::new(ParseErrorKind::InvalidParameter, line_num, start + eq + 1)
                .with_context(rest),
        );
    }

    let param_name = &rest[..eq];
    let mut values = Vec::new();
    let mut pos = start + eq + 1;

    loop {
        let (value, end) = parse_param_value(line, pos, line_num)?;
        values.push(value);

        match line[end..].chars().next() {
            Some(',') => pos = end + 1,
            Some(';' | ':') => return Ok((Parameter::with_values(param_name, values), end)),
            Some(c) => {
                return Err(
                    ParseError::new(ParseErrorKind::InvalidParameter, line_num, end + 1)
                        .with_context(format!("unexpected character '{c}'")),
                );
            }
            None => {
                return Err(ParseError::new(
                    ParseErrorKind::MissingColon,
                    line_num,
                    line.len(),
                ));
            }
        }
    }
}

/// Parses a parameter value, quoted or not, starting at byte `start`.
///
/// Returns the decoded value and the byte index just past it.
fn parse_param_value(line: &str, start: usize, line_num: usize) -> ParseResult<(String, usize)> {
    let rest = &line[start..];

    if let Some(quoted) = rest.strip_prefix('"') {
        let Some(close) = quoted.find('"') else {
            return Err(ParseError::new(
                ParseErrorKind::UnclosedQuote,
                line_num,
                start + 1,
            ));
        };
        let value = decode_caret(&quoted[..close]);
        return Ok((value, start + close + 2));
    }

    let len = rest.find([',', ';', ':']).unwrap_or(rest.len());
    Ok((decode_caret(&rest[..len]), start + len))
}

/// Applies RFC 6868 caret decoding (`^^`, `^n`, `^'`).
///
/// Unknown escapes are kept verbatim.
fn decode_caret(raw: &str) -> String {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '^' {
            value.push(c);
            continue;
        }
        match chars.peek() {
            Some('^') => value.push('^'),
            Some('n') => value.push('\n'),
            Some('\'') => value.push('"'),
            _ => {
                value.push('^');
                continue;
            }
        }
        chars.next();
    }

    value
}
