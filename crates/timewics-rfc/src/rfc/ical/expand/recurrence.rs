//! Recurrence rule compilation on top of the `rrule` crate.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use rrule::{RRule, RRuleSet, Unvalidated};

use super::normalize::format_utc;
use super::timezone::localize;
use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::core::{DateTimeForm, DateTimeValue, RecurrenceRule};

/// A recurrence rule anchored at a start time in a zone.
///
/// Occurrences are wall-clock times in the anchoring zone, ascending and
/// without duplicates. Iteration is lazy and can be restarted.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule: RecurrenceRule,
    zone: Tz,
    dtstart: NaiveDateTime,
    /// `None` when the rule cannot produce anything (`UNTIL` before start).
    set: Option<RRuleSet>,
    /// Inclusive upper bound: the `UNTIL` instant, or the last occurrence
    /// of a `COUNT` rule.
    until: Option<DateTime<Utc>>,
}

impl CompiledRule {
    /// ## Summary
    /// Anchors `rule` at `dtstart`, a wall-clock time in `zone`.
    ///
    /// `UNTIL` is read as a UTC instant when `Z`-suffixed, as wall clock in
    /// `zone` when floating, and as midnight in `zone` when date-only. For
    /// `COUNT` rules the last occurrence is materialized to serve as the
    /// effective bound.
    ///
    /// ## Errors
    /// Returns an error if `dtstart` or `UNTIL` cannot be placed in `zone`,
    /// or if the `rrule` crate rejects the rule.
    #[tracing::instrument(skip_all, fields(rule = %rule, %dtstart, zone = zone.name()))]
    pub fn compile(rule: &RecurrenceRule, dtstart: NaiveDateTime, zone: Tz) -> RfcResult<Self> {
        let start = localize(dtstart, zone)?;
        let until_bound = rule
            .until
            .map(|until| until_instant(until, zone))
            .transpose()?;

        if until_bound.is_some_and(|bound| bound < start.with_timezone(&Utc)) {
            tracing::debug!("UNTIL precedes DTSTART, rule yields nothing");
            return Ok(Self {
                rule: rule.clone(),
                zone,
                dtstart,
                set: None,
                until: until_bound,
            });
        }

        // rrule expects UNTIL in UTC once DTSTART carries a zone
        let mut anchored = rule.clone();
        anchored.until = until_bound.map(|bound| DateTimeValue {
            value: bound.naive_utc(),
            form: DateTimeForm::Utc,
        });

        let set = anchored
            .to_string()
            .parse::<RRule<Unvalidated>>()
            .map_err(|err| rule_error(&err))?
            .build(start.with_timezone(&rrule::Tz::Tz(zone)))
            .map_err(|err| rule_error(&err))?;

        let until = match (until_bound, rule.count) {
            (Some(bound), _) => Some(bound),
            (None, Some(_)) => (&set).into_iter().last().map(|dt| dt.with_timezone(&Utc)),
            (None, None) => None,
        };

        tracing::trace!(until = ?until, "Compiled recurrence rule");

        Ok(Self {
            rule: rule.clone(),
            zone,
            dtstart,
            set: Some(set),
            until,
        })
    }

    #[must_use]
    pub fn rule(&self) -> &RecurrenceRule {
        &self.rule
    }

    #[must_use]
    pub fn zone(&self) -> Tz {
        self.zone
    }

    #[must_use]
    pub fn dtstart(&self) -> NaiveDateTime {
        self.dtstart
    }

    /// True iff the rule has neither `UNTIL` nor `COUNT`.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.rule.is_unbounded()
    }

    /// Returns the effective inclusive bound as a UTC instant.
    #[must_use]
    pub fn until(&self) -> Option<DateTime<Utc>> {
        self.until
    }

    /// Renders the effective bound as `YYYYMMDDTHHMMSSZ`.
    #[must_use]
    pub fn formatted_until(&self) -> Option<String> {
        self.until.map(format_utc)
    }

    /// Lazily enumerates occurrences as wall-clock times in the rule's zone.
    ///
    /// Unbounded rules never end; callers must stop on their own.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.set
            .iter()
            .flat_map(|set| set.into_iter())
            .map(|dt| dt.naive_local())
    }

    /// ## Summary
    /// Materializes every occurrence.
    ///
    /// ## Errors
    /// Returns `RfcError::UnboundedRecurrence` for rules without `UNTIL` or
    /// `COUNT`.
    pub fn all(&self) -> RfcResult<Vec<NaiveDateTime>> {
        if self.is_unbounded() {
            return Err(RfcError::UnboundedRecurrence(self.rule.to_string()));
        }
        Ok(self.iter().collect())
    }
}

const RRULE_ERROR_PREFIXES: [&str; 2] = ["RRule validation error: ", "RRule parsing error: "];

/// Wraps an `rrule` error, dropping the category prefix it already carries.
fn rule_error(err: &impl std::fmt::Display) -> RfcError {
    let message = err.to_string();
    let detail = RRULE_ERROR_PREFIXES
        .iter()
        .find_map(|prefix| message.strip_prefix(prefix))
        .unwrap_or(&message);
    RfcError::RuleValidation(detail.to_string())
}

/// Places an `UNTIL` value on the UTC timeline.
fn until_instant(until: DateTimeValue, zone: Tz) -> RfcResult<DateTime<Utc>> {
    if until.is_utc() {
        return Ok(until.value.and_utc());
    }
    Ok(localize(until.value, zone)?.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::ical::core::Frequency;
    use crate::rfc::ical::parse::{ParseErrorKind, parse_rrule};

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn compile(text: &str, start: &str, zone: Tz) -> CompiledRule {
        let rule = parse_rrule(text, 1, 1).unwrap();
        CompiledRule::compile(&rule, dt(start), zone).unwrap()
    }

    #[test_log::test]
    fn daily_count_yields_increasing_occurrences_from_start() {
        let compiled = compile("FREQ=DAILY;COUNT=3", "2024-01-01 09:00", Tz::UTC);

        let all = compiled.all().unwrap();
        assert_eq!(
            all,
            [
                dt("2024-01-01 09:00"),
                dt("2024-01-02 09:00"),
                dt("2024-01-03 09:00")
            ]
        );
        assert!(!compiled.is_unbounded());
        assert_eq!(compiled.formatted_until().as_deref(), Some("20240103T090000Z"));
    }

    #[test]
    fn iteration_is_restartable() {
        let compiled = compile("FREQ=WEEKLY;COUNT=4", "2024-01-01 09:00", Tz::UTC);
        let first: Vec<_> = compiled.iter().collect();
        let second: Vec<_> = compiled.iter().collect();
        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
    }

    #[test]
    fn until_before_start_is_empty() {
        let compiled = compile("FREQ=DAILY;UNTIL=20231231T090000Z", "2024-01-01 09:00", Tz::UTC);
        assert_eq!(compiled.iter().count(), 0);
        assert!(compiled.all().unwrap().is_empty());
        assert!(!compiled.is_unbounded());
    }

    #[test]
    fn unbounded_rule_is_lazy_but_not_materializable() {
        let compiled = compile("FREQ=HOURLY;INTERVAL=6", "2024-01-01 00:00", Tz::UTC);
        assert!(compiled.is_unbounded());
        assert_eq!(compiled.formatted_until(), None);

        let first: Vec<_> = compiled.iter().take(3).collect();
        assert_eq!(
            first,
            [
                dt("2024-01-01 00:00"),
                dt("2024-01-01 06:00"),
                dt("2024-01-01 12:00")
            ]
        );
        assert!(matches!(compiled.all(), Err(RfcError::UnboundedRecurrence(_))));
    }

    #[test]
    fn weekly_byday_count() {
        let compiled = compile("FREQ=WEEKLY;COUNT=2;BYDAY=MO", "2024-01-01 10:00", Tz::UTC);
        assert_eq!(
            compiled.all().unwrap(),
            [dt("2024-01-01 10:00"), dt("2024-01-08 10:00")]
        );
    }

    #[test]
    fn wall_clock_is_kept_across_dst() {
        let compiled = compile("FREQ=DAILY;COUNT=3", "2024-03-09 09:00", Tz::America__New_York);
        assert_eq!(
            compiled.all().unwrap(),
            [
                dt("2024-03-09 09:00"),
                dt("2024-03-10 09:00"),
                dt("2024-03-11 09:00")
            ]
        );
        // 09:00 EDT on the 11th
        assert_eq!(compiled.formatted_until().as_deref(), Some("20240311T130000Z"));
    }

    #[test]
    fn floating_until_is_inclusive_wall_clock() {
        let compiled = compile(
            "FREQ=DAILY;UNTIL=20240103T090000",
            "2024-01-01 09:00",
            Tz::Europe__Paris,
        );
        assert_eq!(compiled.all().unwrap().len(), 3);
        assert_eq!(compiled.formatted_until().as_deref(), Some("20240103T080000Z"));
    }

    #[test]
    fn date_until_means_midnight() {
        let compiled = compile("FREQ=DAILY;UNTIL=20240103", "2024-01-01 09:00", Tz::UTC);
        assert_eq!(
            compiled.all().unwrap(),
            [dt("2024-01-01 09:00"), dt("2024-01-02 09:00")]
        );
    }

    #[test]
    fn filters_outside_their_frequency_are_refused() {
        let cases = [
            "FREQ=WEEKLY;BYDAY=2FR;COUNT=2",
            "FREQ=DAILY;BYYEARDAY=100;COUNT=2",
            "FREQ=MONTHLY;BYWEEKNO=20;COUNT=2",
            "FREQ=WEEKLY;BYMONTHDAY=15;COUNT=2",
        ];
        for text in cases {
            let err = parse_rrule(text, 4, 1).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::InvalidRRule, "{text}");
            assert_eq!(err.line, 4, "{text}");
        }
    }

    #[test]
    fn expansion_rejections_are_reported_once() {
        let mut rule = RecurrenceRule::new(Frequency::Daily);
        rule.count = Some(2);
        rule.by_yearday = vec![100];

        let err = CompiledRule::compile(&rule, dt("2024-01-01 09:00"), Tz::UTC).unwrap_err();
        assert!(matches!(err, RfcError::RuleValidation(_)), "{err:?}");
        assert_eq!(err.to_string().matches("RRule validation error").count(), 1, "{err}");
    }

    #[test]
    fn bysetpos_selects_last_weekday_of_month() {
        let compiled = compile(
            "FREQ=MONTHLY;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-1;COUNT=3",
            "2024-01-31 09:00",
            Tz::UTC,
        );
        assert_eq!(
            compiled.all().unwrap(),
            [
                dt("2024-01-31 09:00"),
                dt("2024-02-29 09:00"),
                dt("2024-03-29 09:00")
            ]
        );
    }
}
