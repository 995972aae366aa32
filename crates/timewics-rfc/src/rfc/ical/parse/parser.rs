//! iCalendar document parser (RFC 5545).
//!
//! Groups content lines into a `Component` tree rooted at `VCALENDAR`.

use super::error::{ParseError, ParseErrorKind, ParseResult};
use super::lexer::{parse_content_line, split_lines};
use crate::rfc::ical::core::{Component, ComponentKind, ContentLine};

/// Parses an iCalendar document from a string.
///
/// ## Errors
///
/// Returns an error if a content line is malformed, the document does not
/// start with `BEGIN:VCALENDAR`, or `BEGIN`/`END` pairs do not match.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse(input: &str) -> ParseResult<Component> {
    tracing::debug!("Parsing iCalendar document");

    let lines = split_lines(input);

    if lines.is_empty() {
        tracing::warn!("Empty iCalendar input");
        return Err(ParseError::new(ParseErrorKind::MissingBegin, 1, 1));
    }

    tracing::info!(count = lines.len(), "Split lines");

    let content_lines: Vec<(usize, ContentLine)> = lines
        .into_iter()
        .map(|(line_num, line)| parse_content_line(&line, line_num).map(|cl| (line_num, cl)))
        .collect::<ParseResult<_>>()?;

    let mut iter = content_lines.into_iter();

    let (line_num, first) = iter
        .next()
        .ok_or_else(|| ParseError::new(ParseErrorKind::MissingBegin, 1, 1))?;

    if first.name != "BEGIN" || ComponentKind::parse(&first.raw_value) != ComponentKind::Calendar {
        tracing::warn!("Root component is not VCALENDAR");
        return Err(ParseError::new(ParseErrorKind::MissingBegin, line_num, 1)
            .with_context("expected BEGIN:VCALENDAR"));
    }

    let root = parse_component(&mut iter, line_num, &first.raw_value)?;

    if let Some((extra_line, extra)) = iter.next() {
        tracing::warn!(line = extra_line, name = %extra.name, "Ignoring content after END:VCALENDAR");
    }

    tracing::debug!(
        events = root.events().len(),
        properties = root.properties.len(),
        "iCalendar document parsed successfully"
    );

    Ok(root)
}

/// Parses a component whose `BEGIN` line has already been consumed.
///
/// Reads properties and nested components until the matching `END`.
fn parse_component(
    iter: &mut impl Iterator<Item = (usize, ContentLine)>,
    begin_line_num: usize,
    component_name: &str,
) -> ParseResult<Component> {
    let mut component = Component::new(component_name.trim(), begin_line_num);
    let mut last_line_num = begin_line_num;

    loop {
        let Some((line_num, content_line)) = iter.next() else {
            return Err(
                ParseError::new(ParseErrorKind::MissingEnd, last_line_num, 1)
                    .with_context(format!("missing END:{}", component.name)),
            );
        };
        last_line_num = line_num;

        match content_line.name.as_str() {
            "BEGIN" => {
                let nested = parse_component(iter, line_num, &content_line.raw_value)?;
                component.add_child(nested);
            }
            "END" => {
                let end_name = content_line.raw_value.trim().to_ascii_uppercase();
                if end_name != component.name {
                    return Err(
                        ParseError::new(ParseErrorKind::MismatchedComponent, line_num, 1)
                            .with_context(format!(
                                "expected END:{}, got END:{end_name}",
                                component.name
                            )),
                    );
                }
                break;
            }
            _ => {
                tracing::trace!(name = %content_line.name, line = line_num, "Content line");
                component.add_property(content_line);
            }
        }
    }

    Ok(component)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_VEVENT: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
X-WR-CALNAME:Team\r\n\
X-WR-TIMEZONE:Europe/Berlin\r\n\
BEGIN:VEVENT\r\n\
UID:test-uid-123@example.com\r\n\
DTSTART:20260123T140000Z\r\n\
DTEND:20260123T150000Z\r\n\
SUMMARY:Test Event\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test_log::test]
    fn parse_simple_vevent() {
        let root = parse(SIMPLE_VEVENT).unwrap();

        assert_eq!(root.kind, ComponentKind::Calendar);
        assert_eq!(
            root.get_property("X-WR-CALNAME").map(|p| p.raw_value.as_str()),
            Some("Team")
        );

        let events = root.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].line, 5);
        assert_eq!(
            events[0].get_property("SUMMARY").map(|p| p.raw_value.as_str()),
            Some("Test Event")
        );
        assert!(root.get_property("SUMMARY").is_none());
    }

    #[test]
    fn parse_with_valarm_keeps_properties_nested() {
        let input = "\
BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
DTSTART:20260123T090000Z\r\n\
SUMMARY:Event with Alarm\r\n\
BEGIN:VALARM\r\n\
ACTION:DISPLAY\r\n\
DURATION:PT15M\r\n\
END:VALARM\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let root = parse(input).unwrap();
        let event = root.events()[0];

        assert!(event.get_property("DURATION").is_none());
        let alarms = event.children_of(ComponentKind::Alarm);
        assert_eq!(alarms.len(), 1);
        assert_eq!(
            alarms[0].get_property("DURATION").map(|p| p.raw_value.as_str()),
            Some("PT15M")
        );
    }

    #[test]
    fn parse_lowercase_and_bare_lf() {
        let input = "begin:vcalendar\nbegin:vevent\nsummary:Lower\nend:vevent\nend:vcalendar\n";
        let root = parse(input).unwrap();
        assert_eq!(root.events().len(), 1);
    }

    #[test]
    fn parse_multiple_events_in_order() {
        let input = "\
BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:Event 1\r\n\
END:VEVENT\r\n\
BEGIN:VTIMEZONE\r\n\
TZID:Europe/Paris\r\n\
END:VTIMEZONE\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:Event 2\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let root = parse(input).unwrap();
        let summaries: Vec<&str> = root
            .events()
            .iter()
            .filter_map(|e| e.get_property("SUMMARY"))
            .map(|p| p.raw_value.as_str())
            .collect();
        assert_eq!(summaries, ["Event 1", "Event 2"]);
    }

    #[test]
    fn parse_with_folded_lines() {
        let input = "\
BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:This is a very long summary that needs to be folded across\r\n  multiple lines\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let root = parse(input).unwrap();
        let summary = &root.events()[0].get_property("SUMMARY").unwrap().raw_value;
        assert!(summary.ends_with("folded across multiple lines"));
    }

    #[test]
    fn parse_missing_begin() {
        let err = parse("VERSION:2.0\r\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingBegin);

        let err = parse("").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingBegin);

        let err = parse("BEGIN:VEVENT\r\nEND:VEVENT\r\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingBegin);
    }

    #[test]
    fn parse_mismatched_end() {
        let input = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
END:VEVENT\r\n";
        let err = parse(input).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MismatchedComponent);
        assert_eq!(err.line, 3);
    }

    #[test]
    fn parse_missing_end() {
        let input = "\
BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:Open\r\n";
        let err = parse(input).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingEnd);
        assert_eq!(err.line, 3);
    }

    #[test]
    fn parse_reports_bad_content_line() {
        let input = "BEGIN:VCALENDAR\r\nBAD NAME:x\r\nEND:VCALENDAR\r\n";
        let err = parse(input).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidPropertyName);
        assert_eq!(err.line, 2);
    }
}
