//! Event model: one `VEVENT` turned into zoned times, compiled rules and a
//! lazy occurrence set.

use std::collections::BTreeSet;
use std::iter::Peekable;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use timewics_rfc::rfc::ical::core::{Component, ContentLine};
use timewics_rfc::rfc::ical::expand::{
    CompiledRule, TimeZoneResolver, format_utc, rezone, standardize, to_utc, wall_clock,
};
use timewics_rfc::rfc::ical::parse::{parse_datetime, parse_duration, parse_rrule};

use crate::error::{ServiceError, ServiceResult};

/// Raw content lines of one `VEVENT`, before any interpretation.
///
/// Only the event's own properties are collected; nested components such as
/// `VALARM` are ignored.
#[derive(Debug, Clone, Default)]
pub struct EventFields {
    /// Line of the event's `BEGIN:VEVENT` (1-based).
    pub line: usize,
    pub summary: Option<ContentLine>,
    pub dtstart: Option<ContentLine>,
    pub dtend: Option<ContentLine>,
    pub duration: Option<ContentLine>,
    pub rrule: Option<ContentLine>,
    pub exrule: Option<ContentLine>,
    pub exdates: Vec<ContentLine>,
}

impl EventFields {
    /// Collects the recognized fields of a `VEVENT` component.
    ///
    /// The first occurrence of a single-valued field wins; every `EXDATE`
    /// line is kept.
    #[must_use]
    pub fn from_component(component: &Component) -> Self {
        let field = |name: &str| component.get_property(name).cloned();

        let fields = Self {
            line: component.line,
            summary: field("SUMMARY"),
            dtstart: field("DTSTART"),
            dtend: field("DTEND"),
            duration: field("DURATION"),
            rrule: field("RRULE"),
            exrule: field("EXRULE"),
            exdates: component
                .get_properties("EXDATE")
                .into_iter()
                .cloned()
                .collect(),
        };

        tracing::trace!(
            line = fields.line,
            has_dtend = fields.dtend.is_some(),
            has_duration = fields.duration.is_some(),
            has_rrule = fields.rrule.is_some(),
            has_exrule = fields.exrule.is_some(),
            exdate_lines = fields.exdates.len(),
            "Extracted event fields"
        );

        fields
    }
}

/// One concrete interval of an event, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Occurrence {
    #[must_use]
    pub fn formatted_start(&self) -> String {
        format_utc(self.start)
    }

    #[must_use]
    pub fn formatted_end(&self) -> String {
        format_utc(self.end)
    }
}

/// A calendar event with every derived field resolved.
///
/// Start and end are wall-clock times in the event's zone. Occurrences are
/// only enumerated on request.
#[derive(Debug, Clone)]
pub struct Event {
    summary: String,
    start_raw: String,
    end_raw: Option<String>,
    duration_raw: Option<String>,
    timezone: Tz,
    all_day: bool,
    start: NaiveDateTime,
    end: NaiveDateTime,
    duration: TimeDelta,
    start_utc: DateTime<Utc>,
    end_utc: DateTime<Utc>,
    recurrence_rule: Option<CompiledRule>,
    exclusion_rule: Option<CompiledRule>,
    exclusion_dates: BTreeSet<NaiveDateTime>,
}

impl Event {
    /// ## Summary
    /// Builds an event from a `VEVENT` component.
    ///
    /// The zone comes from the `DTSTART` `TZID` parameter, falling back to
    /// `default_timezone`. `DTEND` wins over `DURATION`; with neither, the
    /// event ends when it starts.
    ///
    /// ## Errors
    /// Returns `ServiceError::MissingProperty` without `SUMMARY` or `DTSTART`,
    /// `ServiceError::InvalidEvent` when the end precedes the start or lies past
    /// the supported date range, and
    /// wrapped parse or timezone errors for malformed values.
    pub fn from_component(
        component: &Component,
        default_timezone: Tz,
        resolver: &mut TimeZoneResolver,
    ) -> ServiceResult<Self> {
        Self::from_fields(&EventFields::from_component(component), default_timezone, resolver)
    }

    /// ## Summary
    /// Builds an event from already extracted fields.
    ///
    /// ## Errors
    /// See [`Event::from_component`].
    #[tracing::instrument(skip_all, fields(line = fields.line))]
    pub fn from_fields(
        fields: &EventFields,
        default_timezone: Tz,
        resolver: &mut TimeZoneResolver,
    ) -> ServiceResult<Self> {
        let line = fields.line;
        let summary = fields
            .summary
            .as_ref()
            .map(ContentLine::text_value)
            .ok_or(ServiceError::MissingProperty("SUMMARY"))?;
        let dtstart = fields
            .dtstart
            .as_ref()
            .ok_or(ServiceError::MissingProperty("DTSTART"))?;

        let timezone = match dtstart.tzid() {
            Some(tzid) => resolver.resolve(tzid)?,
            None => default_timezone,
        };

        let start_raw = dtstart.qualified_value();
        let start = standardize(Some(start_raw.as_str()), timezone, line)?.ok_or(
            ServiceError::MissingProperty("DTSTART"),
        )?;

        let all_day =
            dtstart.is_date_only() || (fields.dtend.is_none() && fields.duration.is_none());

        let (end, duration) = match (&fields.dtend, &fields.duration) {
            (Some(dtend), _) => {
                let end = zoned_wall_clock(dtend, &dtend.raw_value, timezone, resolver, line)?;
                (end, end - start)
            }
            (None, Some(duration)) => {
                let duration = parse_duration(duration.raw_value.trim(), line, 1)?.to_time_delta();
                let end = start.checked_add_signed(duration).ok_or_else(|| {
                    ServiceError::InvalidEvent(format!(
                        "\"{summary}\" lasts {duration}, which ends past the supported range"
                    ))
                })?;
                (end, duration)
            }
            (None, None) => (start, TimeDelta::zero()),
        };

        if end < start {
            return Err(ServiceError::InvalidEvent(format!(
                "\"{summary}\" ends ({end}) before it starts ({start})"
            )));
        }

        let recurrence_rule = compile_rule(fields.rrule.as_ref(), start, timezone, line)?;
        let exclusion_rule = compile_rule(fields.exrule.as_ref(), start, timezone, line)?;

        let mut exclusion_dates = BTreeSet::new();
        for exdate in &fields.exdates {
            for token in exdate.raw_value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                exclusion_dates.insert(zoned_wall_clock(exdate, token, timezone, resolver, line)?);
            }
        }

        let start_utc = to_utc(start, timezone)?;
        let end_utc = to_utc(end, timezone)?;

        tracing::debug!(
            %summary,
            zone = timezone.name(),
            %start,
            %end,
            all_day,
            repeats = recurrence_rule.is_some(),
            exdates = exclusion_dates.len(),
            "Built event"
        );

        Ok(Self {
            summary,
            start_raw,
            end_raw: fields.dtend.as_ref().map(ContentLine::qualified_value),
            duration_raw: fields.duration.as_ref().map(|d| d.raw_value.clone()),
            timezone,
            all_day,
            start,
            end,
            duration,
            start_utc,
            end_utc,
            recurrence_rule,
            exclusion_rule,
            exclusion_dates,
        })
    }

    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// `DTSTART` with its parameters, e.g. `TZID=Europe/Paris:20240101T090000`.
    #[must_use]
    pub fn start_raw(&self) -> &str {
        &self.start_raw
    }

    #[must_use]
    pub fn end_raw(&self) -> Option<&str> {
        self.end_raw.as_deref()
    }

    #[must_use]
    pub fn duration_raw(&self) -> Option<&str> {
        self.duration_raw.as_deref()
    }

    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.duration
    }

    #[must_use]
    pub fn recurrence_rule(&self) -> Option<&CompiledRule> {
        self.recurrence_rule.as_ref()
    }

    #[must_use]
    pub fn exclusion_rule(&self) -> Option<&CompiledRule> {
        self.exclusion_rule.as_ref()
    }

    #[must_use]
    pub fn exclusion_dates(&self) -> &BTreeSet<NaiveDateTime> {
        &self.exclusion_dates
    }

    /// An event is all-day when `DTSTART` is a bare date or it has neither
    /// `DTEND` nor `DURATION`.
    #[must_use]
    pub fn is_all_day(&self) -> bool {
        self.all_day
    }

    #[must_use]
    pub fn does_repeat(&self) -> bool {
        self.recurrence_rule.is_some()
    }

    /// Start as `YYYYMMDDTHHMMSSZ`.
    #[must_use]
    pub fn formatted_start(&self) -> String {
        format_utc(self.start_utc)
    }

    /// End as `YYYYMMDDTHHMMSSZ`.
    #[must_use]
    pub fn formatted_end(&self) -> String {
        format_utc(self.end_utc)
    }

    /// Lazily enumerates occurrence start times as wall clock in the event's
    /// zone.
    ///
    /// Repeating events yield the recurrence rule's occurrences minus those
    /// of the exclusion rule and the exclusion dates. Other events yield
    /// their start once.
    #[must_use]
    pub fn occurrence_set(&self) -> OccurrenceSet<'_> {
        match &self.recurrence_rule {
            Some(rule) => OccurrenceSet {
                base: Box::new(rule.iter()),
                excluded: self
                    .exclusion_rule
                    .as_ref()
                    .map(|exrule| (Box::new(exrule.iter()) as DateIter<'_>).peekable()),
                exclusion_dates: Some(&self.exclusion_dates),
            },
            None => OccurrenceSet {
                base: Box::new(std::iter::once(self.start)),
                excluded: None,
                exclusion_dates: None,
            },
        }
    }

    /// ## Summary
    /// Lazily enumerates the event's intervals in UTC.
    ///
    /// Each occurrence lasts the event's duration, added as wall-clock time
    /// before conversion. Single events yield exactly one interval.
    ///
    /// ## Errors
    /// Returns `ServiceError::UnboundedRecurrence` when the recurrence rule has
    /// neither `UNTIL` nor `COUNT`. Items fail individually when a time cannot
    /// be placed in the event's zone or its end leaves the supported range.
    pub fn occurrences(
        &self,
    ) -> ServiceResult<impl Iterator<Item = ServiceResult<Occurrence>> + '_> {
        if self
            .recurrence_rule
            .as_ref()
            .is_some_and(CompiledRule::is_unbounded)
        {
            return Err(ServiceError::UnboundedRecurrence {
                summary: self.summary.clone(),
            });
        }

        let zone = self.timezone;
        let duration = self.duration;
        Ok(self.occurrence_set().map(move |local| {
            let end = local.checked_add_signed(duration).ok_or_else(|| {
                ServiceError::InvalidEvent(format!(
                    "occurrence at {local} lasts {duration}, which ends past the supported range"
                ))
            })?;
            Ok(Occurrence {
                start: to_utc(local, zone)?,
                end: to_utc(end, zone)?,
            })
        }))
    }
}

type DateIter<'a> = Box<dyn Iterator<Item = NaiveDateTime> + 'a>;

/// Occurrences of an event after exclusions, ascending.
///
/// The exclusion rule is merged lazily: it is only advanced up to the
/// current candidate, so unbounded exclusion rules are fine.
pub struct OccurrenceSet<'a> {
    base: DateIter<'a>,
    excluded: Option<Peekable<DateIter<'a>>>,
    exclusion_dates: Option<&'a BTreeSet<NaiveDateTime>>,
}

impl Iterator for OccurrenceSet<'_> {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let candidate = self.base.next()?;

            if self
                .exclusion_dates
                .is_some_and(|dates| dates.contains(&candidate))
            {
                tracing::trace!(%candidate, "Skipping excluded date");
                continue;
            }

            if let Some(excluded) = self.excluded.as_mut() {
                while excluded.next_if(|ex| *ex < candidate).is_some() {}
                if excluded.next_if_eq(&candidate).is_some() {
                    tracing::trace!(%candidate, "Skipping exclusion rule match");
                    continue;
                }
            }

            return Some(candidate);
        }
    }
}

/// Interprets a date-time token of `line` as wall clock in `zone`.
///
/// UTC values are converted; values whose `TZID` names another zone are
/// moved into `zone`; everything else is already wall clock.
fn zoned_wall_clock(
    line: &ContentLine,
    token: &str,
    zone: Tz,
    resolver: &mut TimeZoneResolver,
    line_num: usize,
) -> ServiceResult<NaiveDateTime> {
    let value = parse_datetime(token, line_num, 1)?;
    if value.is_utc() {
        return Ok(wall_clock(value, zone));
    }

    match line.tzid() {
        Some(tzid) => {
            let source = resolver.resolve(tzid)?;
            Ok(rezone(value.value, source, zone)?)
        }
        None => Ok(value.value),
    }
}

fn compile_rule(
    line: Option<&ContentLine>,
    start: NaiveDateTime,
    zone: Tz,
    line_num: usize,
) -> ServiceResult<Option<CompiledRule>> {
    let Some(line) = line else {
        return Ok(None);
    };
    let rule = parse_rrule(&line.raw_value, line_num, 1)?;
    Ok(Some(CompiledRule::compile(&rule, start, zone)?))
}
