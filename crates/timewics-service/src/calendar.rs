//! Calendar model: a parsed `VCALENDAR` with its name, default zone and
//! events.

use chrono_tz::Tz;
use timewics_rfc::rfc::ical::core::ContentLine;
use timewics_rfc::rfc::ical::expand::TimeZoneResolver;
use timewics_rfc::rfc::ical::parse::parse;

use crate::error::ServiceResult;
use crate::event::Event;

/// Zone used when a document names none and the caller gives no fallback.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// A calendar document, immutable once parsed.
#[derive(Debug, Clone)]
pub struct Calendar {
    name: String,
    default_timezone: Tz,
    events: Vec<Event>,
}

impl Calendar {
    /// ## Summary
    /// Parses a calendar document, falling back to UTC when it has no
    /// `X-WR-TIMEZONE`.
    ///
    /// ## Errors
    /// See [`Calendar::parse_with_default_timezone`].
    pub fn parse(text: &str) -> ServiceResult<Self> {
        Self::parse_with_default_timezone(text, DEFAULT_TIMEZONE)
    }

    /// ## Summary
    /// Parses a calendar document.
    ///
    /// `X-WR-CALNAME` becomes the name (empty when absent). `X-WR-TIMEZONE`
    /// becomes the default zone, else `fallback`. Events are built in
    /// document order; an event's own `DTSTART` `TZID` overrides the default.
    ///
    /// ## Errors
    /// Returns the first parse, timezone or event error encountered. Nothing
    /// is skipped silently.
    #[tracing::instrument(skip(text), fields(input_len = text.len()))]
    pub fn parse_with_default_timezone(text: &str, fallback: &str) -> ServiceResult<Self> {
        let root = parse(text)?;
        let mut resolver = TimeZoneResolver::new();

        let name = root
            .get_property("X-WR-CALNAME")
            .map(ContentLine::text_value)
            .unwrap_or_default();

        let default_timezone = match root.get_property("X-WR-TIMEZONE") {
            Some(line) => resolver.resolve(line.raw_value.trim())?,
            None => {
                tracing::debug!(fallback, "Calendar has no X-WR-TIMEZONE");
                resolver.resolve(fallback)?
            }
        };

        let events = root
            .events()
            .into_iter()
            .map(|component| Event::from_component(component, default_timezone, &mut resolver))
            .collect::<ServiceResult<Vec<_>>>()?;

        tracing::info!(
            %name,
            timezone = default_timezone.name(),
            events = events.len(),
            "Calendar parsed"
        );

        Ok(Self {
            name,
            default_timezone,
            events,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn default_timezone(&self) -> Tz {
        self.default_timezone
    }

    /// Events in document order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
